use chrono::{Months, NaiveDate};

use crate::ledger::DateRange;
use crate::{CoreError, CoreResult};

/// Builds the optional inclusive window for `summary`. Either bound may be
/// omitted; an open side is clamped to the representable calendar.
pub fn build_range(
    from: Option<&str>,
    to: Option<&str>,
    command: &str,
) -> CoreResult<Option<DateRange>> {
    let parsed_from = match from {
        Some(value) => Some(parse_iso_date_strict(value, "from", command)?),
        None => None,
    };
    let parsed_to = match to {
        Some(value) => Some(parse_iso_date_strict(value, "to", command)?),
        None => None,
    };

    if let (Some(start), Some(end)) = (parsed_from, parsed_to)
        && start > end
    {
        return Err(CoreError::invalid_argument_for_command(
            "Invalid date range: `from` must be on or before `to`.",
            Some(command),
        ));
    }

    if parsed_from.is_none() && parsed_to.is_none() {
        return Ok(None);
    }

    Ok(Some(DateRange {
        start: parsed_from.unwrap_or(NaiveDate::MIN),
        end: parsed_to.unwrap_or(NaiveDate::MAX),
    }))
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso_date_strict(value: &str, field_name: &str, command: &str) -> CoreResult<NaiveDate> {
    if !looks_like_iso_date(value) {
        return Err(CoreError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CoreError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with valid calendar values."),
            Some(command),
        )
    })
}

/// `months` calendar months before `date`, clamped to the end of a shorter
/// month (Aug 31 minus six months is Feb 29 in a leap year).
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

pub(crate) fn looks_like_iso_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{build_range, format_iso_date, months_before};

    #[test]
    fn six_months_back_clamps_to_month_end() {
        let aug_31 = NaiveDate::from_ymd_opt(2024, 8, 31);
        assert!(aug_31.is_some());
        if let Some(value) = aug_31 {
            let back = months_before(value, 6);
            assert_eq!(format_iso_date(&back), "2024-02-29");
        }
    }

    #[test]
    fn month_arithmetic_crosses_year_boundaries() {
        let feb_15 = NaiveDate::from_ymd_opt(2024, 2, 15);
        assert!(feb_15.is_some());
        if let Some(value) = feb_15 {
            assert_eq!(format_iso_date(&months_before(value, 6)), "2023-08-15");
            assert_eq!(format_iso_date(&months_before(value, 14)), "2022-12-15");
        }
    }

    #[test]
    fn build_range_rejects_reversed_bounds() {
        let result = build_range(Some("2024-03-01"), Some("2024-02-01"), "summary");
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
        }
    }

    #[test]
    fn build_range_without_bounds_is_unfiltered() {
        let result = build_range(None, None, "summary");
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn build_range_rejects_impossible_calendar_dates() {
        let result = build_range(Some("2024-02-30"), None, "summary");
        assert!(result.is_err());
        if let Err(error) = result {
            assert!(error.message.contains("calendar"));
        }
    }
}
