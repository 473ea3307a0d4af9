use chrono::{Datelike, NaiveDate};

/// Bucket used when a demographic field is missing or blank.
pub const UNKNOWN_BUCKET: &str = "Unknown";

/// Age bands in display order.
pub const AGE_GROUPS: [&str; 7] = ["Under 18", "18-24", "25-34", "35-44", "45-54", "55-64", "65+"];

/// Bucket key for a free-text demographic value.
pub fn bucket_label(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN_BUCKET,
    }
}

/// Age in whole years on `today`, one less when the birth month is still ahead.
///
/// `None` when the birth year is so far out of range that the subtraction overflows.
pub fn age_on(birth_month: u32, birth_year: i32, today: NaiveDate) -> Option<i32> {
    let age = today.year().checked_sub(birth_year)?;
    if today.month() < birth_month {
        age.checked_sub(1)
    } else {
        Some(age)
    }
}

pub fn age_group(age: i32) -> &'static str {
    match age {
        i32::MIN..=17 => AGE_GROUPS[0],
        18..=24 => AGE_GROUPS[1],
        25..=34 => AGE_GROUPS[2],
        35..=44 => AGE_GROUPS[3],
        45..=54 => AGE_GROUPS[4],
        55..=64 => AGE_GROUPS[5],
        _ => AGE_GROUPS[6],
    }
}

/// Age band for a member, or `None` when birth data is missing or invalid.
pub fn age_group_for(
    birth_month: Option<i32>,
    birth_year: Option<i32>,
    today: NaiveDate,
) -> Option<&'static str> {
    let month = u32::try_from(birth_month?).ok().filter(|m| (1..=12).contains(m))?;
    age_on(month, birth_year?, today).map(age_group)
}
