//! schedule
//!
//! Check-frequency throttling.
//!
//! Decides whether a remote check is due, given the persisted last-check
//! timestamp and a configured frequency. No side effects; the engine owns
//! reading and writing the timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of whole calendar days between remote checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckFrequency {
    /// Check on every invocation.
    Immediate,
    /// At most once a day.
    #[default]
    Daily,
    /// At most once a week.
    Weekly,
}

impl CheckFrequency {
    /// Day threshold for this frequency.
    pub fn days(self) -> i64 {
        match self {
            CheckFrequency::Immediate => 0,
            CheckFrequency::Daily => 1,
            CheckFrequency::Weekly => 7,
        }
    }
}

/// Whether a new remote check should run now.
///
/// True when no check has ever completed, when the frequency is
/// `Immediate`, or when at least `frequency.days()` calendar days have
/// passed since the last check.
///
/// The difference is measured in calendar days rather than elapsed
/// seconds: a check at 23:59 makes the next one due at 00:00, which is
/// what "once a day" means to a person.
pub fn is_due(
    last_check: Option<DateTime<Utc>>,
    frequency: CheckFrequency,
    now: DateTime<Utc>,
) -> bool {
    if frequency == CheckFrequency::Immediate {
        return true;
    }

    let Some(last) = last_check else {
        return true;
    };

    let elapsed_days = (now.date_naive() - last.date_naive()).num_days();
    elapsed_days >= frequency.days()
}
