use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EpochError {
    #[error("Unable to interpret '{0}' as a decimal year or date")]
    Unparseable(String),

    #[error("Year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}

/// Converts a datetime into a decimal year, i.e. the year plus the elapsed fraction of it.
pub fn decimal_year(datetime: NaiveDateTime) -> Result<f64, EpochError> {
    let year = datetime.year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(EpochError::InvalidYear(year))?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(EpochError::InvalidYear(year))?;

    let elapsed = (datetime - start).num_seconds() as f64;
    let length = (end - start).num_seconds() as f64;
    Ok(year as f64 + elapsed / length)
}

/// Parses an epoch given as `2016.1`, `2016-02-06` or `2016-02-06T12:00:00`.
pub fn parse_epoch(value: &str) -> Result<f64, EpochError> {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::from_str(value) {
        return decimal_year(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let dt = d
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| EpochError::Unparseable(value.to_string()))?;
        return decimal_year(dt);
    }
    match value.parse::<f64>() {
        Ok(year) if year.is_finite() => Ok(year),
        _ => Err(EpochError::Unparseable(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn start_of_year_is_whole() {
        assert_eq!(parse_epoch("2016-01-01"), Ok(2016.0));
    }

    #[test]
    fn leap_year_midpoint() {
        // 2016 has 366 days, so the start of July 2nd is exactly half way
        let mid = parse_epoch("2016-07-02T00:00:00").unwrap();
        assert!(is_close!(mid, 2016.5));
    }

    #[test]
    fn decimal_years_pass_through() {
        assert_eq!(parse_epoch(" 2016.1 "), Ok(2016.1));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(parse_epoch("soon"), Err(EpochError::Unparseable(_))));
        assert!(matches!(parse_epoch("NaN"), Err(EpochError::Unparseable(_))));
    }
}
