use chrono::NaiveDate;

use crate::error::{FixError, Result};

/// Parse a roll date given as dd/mm/yyyy
pub fn parse_roll_date(input: &str) -> Result<NaiveDate> {
    let parse_err = |reason: &str| FixError::Parse {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = input.trim().split('/').collect();
    let &[day, month, year] = fields.as_slice() else {
        return Err(parse_err("expected dd/mm/yyyy"));
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(day) || !all_digits(month) || !all_digits(year) {
        return Err(parse_err("day, month and year must be numeric"));
    }
    if day.len() > 2 || month.len() > 2 {
        return Err(parse_err("day and month take at most two digits"));
    }
    if year.len() != 4 {
        return Err(parse_err("year must have four digits"));
    }

    // Digits-only and short, so these cannot overflow
    let day: u32 = day.parse().map_err(|_| parse_err("invalid day"))?;
    let month: u32 = month.parse().map_err(|_| parse_err("invalid month"))?;
    let year: i32 = year.parse().map_err(|_| parse_err("invalid year"))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| parse_err("day or month out of range"))
}
