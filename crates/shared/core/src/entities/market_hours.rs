use serde::{Deserialize, Serialize};

use crate::values::Timestamp;

/// Trading window of a venue, `[open, close)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketHours {
    pub open: Timestamp,
    pub close: Timestamp,
}

impl MarketHours {
    pub fn new(open: Timestamp, close: Timestamp) -> Self {
        Self { open, close }
    }

    pub fn is_open(&self, now: Timestamp) -> bool {
        now >= self.open && now < self.close
    }

    pub fn is_closed(&self, now: Timestamp) -> bool {
        now >= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_window_is_half_open() {
        let open = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let hours = MarketHours::new(open, open + Duration::hours(1));

        assert!(!hours.is_open(open - Duration::nanoseconds(1)));
        assert!(hours.is_open(open));
        assert!(!hours.is_closed(open));
        assert!(!hours.is_open(hours.close));
        assert!(hours.is_closed(hours.close));
    }
}
