use chrono::{FixedOffset, NaiveDate, Utc};

/// Source of "today" for every streak calculation.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock pinned to one fixed UTC offset.
///
/// All "today" computations go through a single offset so a check-in near
/// midnight lands on the same calendar date everywhere.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Clock for OffsetClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// A clock that always reports the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn offset_clock_uses_its_offset() {
        let plus_eight = FixedOffset::east_opt(8 * 3600).unwrap();
        let minus_eight = FixedOffset::west_opt(8 * 3600).unwrap();

        // 20:00 UTC is already the next day at UTC+8, still the same day at UTC-8.
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap();
        assert_eq!(
            instant.with_timezone(&plus_eight).date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()
        );
        assert_eq!(
            instant.with_timezone(&minus_eight).date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );

        let clock = OffsetClock::new(plus_eight);
        let expected = Utc::now().with_timezone(&plus_eight).date_naive();
        let today = clock.today();
        assert!(today == expected || today == expected.succ_opt().unwrap());
    }

    #[test]
    fn fixed_clock_is_fixed() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(FixedClock(day).today(), day);
    }
}
