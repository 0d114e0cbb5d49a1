use chrono::{Local, NaiveDate};

/// Source of "today" for every time-windowed computation.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Clock, FixedClock, SystemClock};

    #[test]
    fn fixed_clock_reports_its_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25);
        assert!(date.is_some());
        if let Some(value) = date {
            assert_eq!(FixedClock(value).today(), value);
        }
    }

    #[test]
    fn system_clock_is_after_the_ledger_epoch() {
        let epoch = NaiveDate::from_ymd_opt(2000, 1, 1);
        assert!(epoch.is_some_and(|value| SystemClock.today() > value));
    }
}
