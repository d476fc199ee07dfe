use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

/// Islamic month names, Indonesian spelling (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabiul Awal",
    "Rabiul Akhir",
    "Jumadil Awal",
    "Jumadil Akhir",
    "Rajab",
    "Syakban",
    "Ramadan",
    "Syawal",
    "Zulkaidah",
    "Zulhijah",
];

fn hijri_month_name(month: usize) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "?"
    }
}

/// Hijri date for `date` shifted by `offset_days` for local moon sighting,
/// e.g. "3 Rabiul Akhir 1448 H". `None` when the date is out of the
/// converter's range.
pub fn hijri_string(date: NaiveDate, offset_days: i32) -> Option<String> {
    let adjusted = date + Duration::days(offset_days as i64);
    let hd = HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    )
    .ok()?;
    Some(format!(
        "{} {} {} H",
        hd.day(),
        hijri_month_name(hd.month()),
        hd.year()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_are_bounded() {
        assert_eq!(hijri_month_name(1), "Muharram");
        assert_eq!(hijri_month_name(12), "Zulhijah");
        assert_eq!(hijri_month_name(13), "?");
    }

    #[test]
    fn formats_with_suffix() {
        let s = hijri_string(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(), 0).unwrap();
        assert!(s.ends_with(" H"));
        assert!(s.contains("144"));
    }
}
