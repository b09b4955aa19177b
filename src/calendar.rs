//! 用药日历
//!
//! 月视图固定 6 行 7 列，从 1 号所在周的周日开始，不足部分用下月日期补齐。

use crate::error::{HealthError, HealthResult};
use crate::records::MedicationReminder;
use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeSet;

/// 月视图格子数
pub const GRID_CELLS: u64 = 42;

/// 解析 `YYYY-MM`
pub fn parse_month(value: &str) -> HealthResult<(i32, u32)> {
    let invalid = || HealthError::InvalidMonth {
        value: value.to_string(),
    };
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// 月视图的 42 个日期
pub fn month_grid(year: i32, month: u32) -> HealthResult<Vec<NaiveDate>> {
    let invalid = || HealthError::InvalidMonth {
        value: format!("{year}-{month:02}"),
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let leading = u64::from(first.weekday().num_days_from_sunday());
    let start = first.checked_sub_days(Days::new(leading)).ok_or_else(invalid)?;

    (0..GRID_CELLS)
        .map(|offset| start.checked_add_days(Days::new(offset)).ok_or_else(invalid))
        .collect()
}

/// 指定日期的提醒，保持插入顺序
pub fn reminders_on(reminders: &[MedicationReminder], date: NaiveDate) -> Vec<&MedicationReminder> {
    reminders.iter().filter(|r| r.date == date).collect()
}

/// 有提醒的日期，升序去重
pub fn dates_with_reminders(reminders: &[MedicationReminder]) -> Vec<NaiveDate> {
    reminders
        .iter()
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::parse_date;

    #[test]
    fn test_month_grid_starts_on_sunday() {
        // 2025-10-01 是周三
        let grid = month_grid(2025, 10).unwrap();
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0], parse_date("2025-09-28").unwrap());
        assert_eq!(grid[3], parse_date("2025-10-01").unwrap());
        assert_eq!(grid[41], parse_date("2025-11-08").unwrap());
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_month_starting_on_sunday_has_no_leading_days() {
        // 2026-02-01 是周日
        let grid = month_grid(2026, 2).unwrap();
        assert_eq!(grid[0], parse_date("2026-02-01").unwrap());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-10").unwrap(), (2025, 10));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("202510").is_err());
        assert!(month_grid(2025, 0).is_err());
    }

    #[test]
    fn test_reminders_by_date() {
        let reminders = vec![
            MedicationReminder::new("1", "维生素C", "2025-10-22", "09:30", "1片").unwrap(),
            MedicationReminder::new("4", "降压药", "2025-10-23", "08:00", "1片").unwrap(),
            MedicationReminder::new("2", "钙片", "2025-10-22", "14:00", "2片").unwrap(),
        ];
        let day = parse_date("2025-10-22").unwrap();
        let names: Vec<_> = reminders_on(&reminders, day)
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["维生素C", "钙片"]);

        assert_eq!(
            dates_with_reminders(&reminders),
            vec![day, parse_date("2025-10-23").unwrap()]
        );
    }
}
