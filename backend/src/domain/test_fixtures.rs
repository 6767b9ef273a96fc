//! Deterministic helpers shared by domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}
