//! Time and timestamp utilities
//!
//! The event log stores creation times as microseconds since the Unix
//! epoch. `now()` truncates to the same precision so an event compares
//! equal before and after a round trip through the database.

use chrono::{DateTime, Utc};

use crate::types::{SwitchError, SwitchResult};

/// Current UTC time at microsecond precision
pub fn now() -> DateTime<Utc> {
    let micros = Utc::now().timestamp_micros();
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}

pub fn to_micros(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

pub fn from_micros(micros: i64) -> SwitchResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| SwitchError::Corrupt(format!("timestamp out of range: {}", micros)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_round_trips_through_micros() {
        let ts = now();
        assert_eq!(from_micros(to_micros(&ts)).unwrap(), ts);
    }

    #[test]
    fn test_from_micros_out_of_range() {
        assert!(matches!(from_micros(i64::MAX), Err(SwitchError::Corrupt(_))));
    }
}
