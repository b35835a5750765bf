// Date paging for date-keyed panels
use crate::domain::error::PanelError;
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use serde::Deserialize;

/// How far back a random pick may reach.
const RANDOM_WINDOW_DAYS: u64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStep {
    Previous,
    Next,
    Today,
    Random,
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, PanelError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| PanelError::Validation(format!("'{}' is not a YYYY-MM-DD date", raw)))
}

/// Reject dates past `today`.
pub fn not_after_today(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, PanelError> {
    if date > today {
        return Err(PanelError::Validation(format!(
            "cannot navigate past {}",
            today
        )));
    }
    Ok(date)
}

pub fn can_go_forward(current: NaiveDate, today: NaiveDate) -> bool {
    current < today
}

/// Resolve a navigation step. Stepping forward from today is rejected and
/// the caller keeps its current date.
pub fn resolve(
    current: NaiveDate,
    step: DateStep,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Result<NaiveDate, PanelError> {
    match step {
        DateStep::Previous => Ok(current.pred_opt().unwrap_or(current)),
        DateStep::Next => {
            let next = current.succ_opt().unwrap_or(current);
            not_after_today(next, today)
        }
        DateStep::Today => Ok(today),
        DateStep::Random => {
            let back = rng.random_range(0..RANDOM_WINDOW_DAYS);
            Ok(today.checked_sub_days(Days::new(back)).unwrap_or(today))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_forward_from_today_is_rejected() {
        let today = date(2024, 6, 15);
        let mut rng = StdRng::seed_from_u64(7);
        let err = resolve(today, DateStep::Next, today, &mut rng).unwrap_err();
        assert!(matches!(err, PanelError::Validation(_)));
        assert!(!can_go_forward(today, today));
    }

    #[test]
    fn test_paging() {
        let today = date(2024, 3, 1);
        let mut rng = StdRng::seed_from_u64(7);
        let yesterday = resolve(today, DateStep::Previous, today, &mut rng).unwrap();
        assert_eq!(yesterday, date(2024, 2, 29));
        assert!(can_go_forward(yesterday, today));
        assert_eq!(resolve(yesterday, DateStep::Next, today, &mut rng).unwrap(), today);
        assert_eq!(
            resolve(date(2020, 1, 1), DateStep::Today, today, &mut rng).unwrap(),
            today
        );
    }

    #[test]
    fn test_random_stays_within_last_year() {
        let today = date(2024, 6, 15);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let picked = resolve(today, DateStep::Random, today, &mut rng).unwrap();
            assert!(picked <= today);
            assert!(picked > date(2023, 6, 15));
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-31").unwrap(), date(2024, 1, 31));
        assert!(matches!(parse_date("2024-02-30"), Err(PanelError::Validation(_))));
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_not_after_today() {
        let today = date(2024, 6, 15);
        assert!(not_after_today(today, today).is_ok());
        assert!(not_after_today(date(2024, 6, 16), today).is_err());
    }
}
