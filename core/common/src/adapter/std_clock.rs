//! システム時計

use crate::ports::outbound::Clock;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct StdClock;

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
