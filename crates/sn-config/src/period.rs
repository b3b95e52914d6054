//! Period length: the width of one statistics bucket.

use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};

pub const SECONDS_PER_DAY: i64 = 24 * 3600;

/// A validated, positive period length in whole days.
///
/// Construction is the only place the `days >= 1` rule is checked; the
/// aggregator never sees a zero or negative period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PeriodLength {
    days: u32,
}

impl PeriodLength {
    pub fn from_days(days: i64) -> ValidationResult<Self> {
        if days < 1 {
            return Err(ValidationError::InvalidPeriod { days });
        }
        let days = u32::try_from(days).map_err(|_| ValidationError::InvalidValue {
            field: "period_days".to_string(),
            message: format!("{} days is too large", days),
        })?;
        Ok(PeriodLength { days })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Period length in seconds.
    pub fn seconds(&self) -> i64 {
        i64::from(self.days) * SECONDS_PER_DAY
    }
}

impl Default for PeriodLength {
    fn default() -> Self {
        PeriodLength { days: 1 }
    }
}

impl TryFrom<i64> for PeriodLength {
    type Error = ValidationError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        PeriodLength::from_days(days)
    }
}

impl From<PeriodLength> for i64 {
    fn from(period: PeriodLength) -> Self {
        i64::from(period.days)
    }
}

impl std::fmt::Display for PeriodLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.days == 1 {
            write!(f, "1 day")
        } else {
            write!(f, "{} days", self.days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_seconds() {
        assert_eq!(PeriodLength::from_days(1).unwrap().seconds(), 86_400);
        assert_eq!(PeriodLength::from_days(7).unwrap().seconds(), 604_800);
    }

    #[test]
    fn test_period_rejects_non_positive() {
        assert!(matches!(
            PeriodLength::from_days(0),
            Err(ValidationError::InvalidPeriod { days: 0 })
        ));
        assert!(matches!(
            PeriodLength::from_days(-5),
            Err(ValidationError::InvalidPeriod { days: -5 })
        ));
    }

    #[test]
    fn test_period_rejects_overflow() {
        assert!(matches!(
            PeriodLength::from_days(i64::from(u32::MAX) + 1),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_period_display() {
        assert_eq!(PeriodLength::default().to_string(), "1 day");
        assert_eq!(PeriodLength::from_days(30).unwrap().to_string(), "30 days");
    }
}
