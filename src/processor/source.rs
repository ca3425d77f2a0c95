//! Line source for measurement files
//!
//! Wraps the input in a buffered reader and yields each line with its
//! 1-based line number. The sequence is lazy and consumed once.

use crate::error::{Result, StatsError};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

type BoxedReader = Box<dyn Read + Send>;

/// Buffered, single-pass reader over a measurements file
pub struct LineSource {
    path: PathBuf,
    reader: BufReader<BoxedReader>,
}

impl LineSource {
    /// Open `path` for reading, reporting bytes read to `progress` if given
    pub fn open(path: &Path, buffer_size: usize, progress: Option<&ProgressBar>) -> Result<Self> {
        let file = File::open(path).map_err(|e| StatsError::io(path, e))?;
        let file_len = file.metadata().map_err(|e| StatsError::io(path, e))?.len();

        debug!("Opened {} ({} bytes)", path.display(), file_len);

        let reader: BoxedReader = match progress {
            Some(pb) => {
                pb.set_length(file_len);
                Box::new(pb.wrap_read(file))
            }
            None => Box::new(file),
        };

        Ok(Self::from_reader(path, buffer_size, reader))
    }

    /// Build a source over any reader; `path` is only used in error messages
    pub fn from_reader(
        path: impl Into<PathBuf>,
        buffer_size: usize,
        reader: impl Read + Send + 'static,
    ) -> Self {
        let reader: BoxedReader = Box::new(reader);
        Self {
            path: path.into(),
            reader: BufReader::with_capacity(buffer_size, reader),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IntoIterator for LineSource {
    type Item = Result<(u64, String)>;
    type IntoIter = Lines;

    fn into_iter(self) -> Lines {
        Lines {
            path: self.path,
            inner: self.reader.lines(),
            line_number: 0,
        }
    }
}

/// Iterator over `(line_number, line)` pairs
///
/// Invalid UTF-8 and read failures surface as `StatsError::Io`.
pub struct Lines {
    path: PathBuf,
    inner: io::Lines<BufReader<BoxedReader>>,
    line_number: u64,
}

impl Iterator for Lines {
    type Item = Result<(u64, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.inner.next()?;
        self.line_number += 1;

        Some(match line {
            Ok(line) => Ok((self.line_number, line)),
            Err(e) => Err(StatsError::io(&self.path, e)),
        })
    }
}
