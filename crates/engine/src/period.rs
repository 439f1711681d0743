//! Calendar month used as the reporting unit of the dashboard, the fixed
//! expense checklist and the exports.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidDate(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(1..=9999).contains(&year) {
            return Err(EngineError::InvalidDate(format!(
                "year must be between 1 and 9999, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month `date` falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        // `new` guarantees a valid (year, month) pair.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Due date for a monthly bill, clamping `day` to the month length
    /// (a bill due on the 31st falls on Feb 28th/29th).
    pub fn due_date(self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or_else(|| self.last_day())
    }

    /// All twelve months of this period's year.
    pub fn months_of_year(self) -> impl Iterator<Item = Period> {
        let year = self.year;
        (1..=12).map(move |month| Period { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

impl std::str::FromStr for Period {
    type Err = EngineError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidDate(format!("expected YYYY-MM, got '{s}'"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(Period::new(2025, 0).is_err());
        assert!(Period::new(2025, 13).is_err());
        assert!(Period::new(2025, 12).is_ok());
    }

    #[test]
    fn rejects_year_outside_four_digits() {
        assert!(Period::new(0, 1).is_err());
        assert!(Period::new(-1, 6).is_err());
        assert!(Period::new(10_000, 1).is_err());
        assert!(Period::new(1, 1).is_ok());
        assert!(Period::new(9_999, 12).is_ok());
        assert!("10000-01".parse::<Period>().is_err());
    }

    #[test]
    fn month_bounds() {
        let feb = Period::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert_eq!(Period::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(2025, 12).unwrap().last_day(), date(2025, 12, 31));
    }

    #[test]
    fn due_date_clamps_to_month_length() {
        let feb = Period::new(2025, 2).unwrap();
        assert_eq!(feb.due_date(31), date(2025, 2, 28));
        assert_eq!(feb.due_date(10), date(2025, 2, 10));
        assert_eq!(feb.due_date(0), date(2025, 2, 1));
    }

    #[test]
    fn previous_and_next_wrap_years() {
        let jan = Period::new(2026, 1).unwrap();
        assert_eq!(jan.previous(), Period::new(2025, 12).unwrap());
        assert_eq!(jan.previous().next(), jan);
    }

    #[test]
    fn parses_year_month() {
        assert_eq!("2025-11".parse::<Period>().unwrap(), Period::new(2025, 11).unwrap());
        assert!("2025/11".parse::<Period>().is_err());
        assert_eq!(Period::new(2025, 3).unwrap().to_string(), "03/2025");
    }

    #[test]
    fn contains_only_same_month() {
        let nov = Period::new(2025, 11).unwrap();
        assert!(nov.contains(date(2025, 11, 30)));
        assert!(!nov.contains(date(2024, 11, 30)));
        assert_eq!(nov.months_of_year().count(), 12);
    }
}
