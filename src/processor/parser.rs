//! Record parser for `station;temperature` lines

use crate::constants::FIELD_DELIMITER;
use crate::error::{Result, StatsError};
use crate::models::Measurement;

/// Parse one line into a measurement
///
/// The line is split on the first `;`. The station name is taken verbatim
/// and reuses the line's allocation. The temperature must parse as a
/// finite `f64`; a trailing `\r` is ignored.
pub fn parse_line(line: String, line_number: u64) -> Result<Measurement> {
    let Some(split) = line.find(FIELD_DELIMITER) else {
        return Err(malformed(line_number, line, "missing ';' delimiter"));
    };

    let raw = line[split + FIELD_DELIMITER.len_utf8()..].trim_end_matches('\r');
    let temperature = match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        Ok(_) => {
            let reason = format!("temperature {:?} is not a finite number", raw);
            return Err(malformed(line_number, line, reason));
        }
        Err(e) => {
            let reason = format!("invalid temperature {:?}: {}", raw, e);
            return Err(malformed(line_number, line, reason));
        }
    };

    let mut station = line;
    station.truncate(split);

    Ok(Measurement {
        station,
        temperature,
    })
}

fn malformed(line_number: u64, line: String, reason: impl Into<String>) -> StatsError {
    StatsError::MalformedRecord {
        line_number,
        line,
        reason: reason.into(),
    }
}
