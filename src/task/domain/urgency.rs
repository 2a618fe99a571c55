//! Deadline urgency classification.
//!
//! Urgency is derived on demand from a deadline and the current time and is
//! never stored on the task.

use chrono::{DateTime, Days, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How close a task is to its deadline, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    /// The warning threshold has not been reached.
    Normal,
    /// The warning threshold has passed.
    Warning,
    /// The danger threshold has passed.
    Critical,
}

impl UrgencyLevel {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day offsets before a deadline at which urgency escalates.
///
/// The danger offset is expected to be no larger than the warning offset.
/// This is not enforced; see [`UrgencyThresholds::is_inverted`].
///
/// # Examples
///
/// ```
/// use tasklane::task::domain::UrgencyThresholds;
///
/// let thresholds = UrgencyThresholds::default();
/// assert_eq!(thresholds.warning_offset_days, 5);
/// assert_eq!(thresholds.danger_offset_days, 2);
/// assert!(!thresholds.is_inverted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyThresholds {
    /// Calendar days before the deadline at which a task turns to warning.
    pub warning_offset_days: u32,
    /// Calendar days before the deadline at which a task turns critical.
    pub danger_offset_days: u32,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            warning_offset_days: 5,
            danger_offset_days: 2,
        }
    }
}

impl UrgencyThresholds {
    /// Creates thresholds from explicit offsets.
    #[must_use]
    pub const fn new(warning_offset_days: u32, danger_offset_days: u32) -> Self {
        Self {
            warning_offset_days,
            danger_offset_days,
        }
    }

    /// Returns `true` when the danger threshold falls after the warning
    /// threshold, in which case `Warning` can be skipped entirely.
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.danger_offset_days > self.warning_offset_days
    }
}

/// Classifies a deadline against `now`.
///
/// Thresholds are computed by calendar-day subtraction in the time zone of
/// `now`, so a day is always a calendar day regardless of DST changes. The
/// danger threshold is checked first. Returns `None` when there is no
/// deadline.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tasklane::task::domain::{UrgencyLevel, UrgencyThresholds, classify_deadline};
///
/// let thresholds = UrgencyThresholds::new(5, 2);
/// let deadline = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).single();
/// let now = Utc
///     .with_ymd_and_hms(2024, 1, 6, 0, 0, 0)
///     .single()
///     .ok_or("invalid timestamp")?;
///
/// assert_eq!(
///     classify_deadline(deadline, &now, thresholds),
///     Some(UrgencyLevel::Warning)
/// );
/// assert_eq!(classify_deadline(None, &now, thresholds), None);
/// # Ok::<(), &'static str>(())
/// ```
#[must_use]
pub fn classify_deadline<Tz: TimeZone>(
    deadline: Option<DateTime<Utc>>,
    now: &DateTime<Tz>,
    thresholds: UrgencyThresholds,
) -> Option<UrgencyLevel> {
    let local_deadline = deadline?.with_timezone(&now.timezone()).naive_local();
    let local_now = now.naive_local();

    if has_passed(local_now, local_deadline, thresholds.danger_offset_days) {
        Some(UrgencyLevel::Critical)
    } else if has_passed(local_now, local_deadline, thresholds.warning_offset_days) {
        Some(UrgencyLevel::Warning)
    } else {
        Some(UrgencyLevel::Normal)
    }
}

/// Returns `true` when `now` lies strictly after `deadline - offset_days`.
///
/// A threshold below the representable range counts as passed.
fn has_passed(now: NaiveDateTime, deadline: NaiveDateTime, offset_days: u32) -> bool {
    deadline
        .checked_sub_days(Days::new(u64::from(offset_days)))
        .is_none_or(|threshold| now > threshold)
}
