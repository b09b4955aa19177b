//! 复查预约

use super::{parse_date, parse_time, Record, RecordId};
use crate::error::HealthResult;
use crate::store::{Classified, ReadContext, Searchable};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// 距离复查不超过该天数时视为紧急
pub const URGENT_DAYS: i64 = 3;

labeled_enum! {
    /// 复查状态
    pub enum CheckupStatus {
        Upcoming => ("upcoming", "即将到来"),
        Completed => ("completed", "已完成"),
        Missed => ("missed", "已错过"),
    }
}

labeled_enum! {
    /// 复查提醒开关
    pub enum ReminderToggle {
        Enabled => ("enabled", "提醒已开启"),
        Disabled => ("disabled", "提醒已关闭"),
    }
}

impl ReminderToggle {
    pub fn toggled(self) -> Self {
        match self {
            ReminderToggle::Enabled => ReminderToggle::Disabled,
            ReminderToggle::Disabled => ReminderToggle::Enabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == ReminderToggle::Enabled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkup {
    pub id: RecordId,
    pub doctor: String,
    pub department: String,
    pub hospital: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// 复查目的
    pub purpose: String,
    pub notes: Option<String>,
    pub status: CheckupStatus,
    pub reminder: ReminderToggle,
}

impl Checkup {
    /// 新建即将到来的复查，提醒默认关闭
    pub fn new(
        id: impl Into<RecordId>,
        doctor: impl Into<String>,
        department: impl Into<String>,
        hospital: impl Into<String>,
        date: &str,
        time: &str,
        purpose: impl Into<String>,
    ) -> HealthResult<Self> {
        Ok(Self {
            id: id.into(),
            doctor: doctor.into(),
            department: department.into(),
            hospital: hospital.into(),
            date: parse_date(date)?,
            time: parse_time(time)?,
            purpose: purpose.into(),
            notes: None,
            status: CheckupStatus::Upcoming,
            reminder: ReminderToggle::Disabled,
        })
    }

    pub fn with_status(mut self, status: CheckupStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_reminder(mut self, reminder: ReminderToggle) -> Self {
        self.reminder = reminder;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// 距离复查还有几天，只对即将到来的复查有值；已过日期为负数
    pub fn days_until(&self, today: NaiveDate) -> Option<i64> {
        (self.status == CheckupStatus::Upcoming).then(|| (self.date - today).num_days())
    }

    /// 即将到来且不超过 [`URGENT_DAYS`] 天
    pub fn is_urgent(&self, today: NaiveDate) -> bool {
        self.days_until(today).is_some_and(|days| days <= URGENT_DAYS)
    }

    /// 倒计时文字："今天" 或 "N天后"
    pub fn countdown(&self, today: NaiveDate) -> Option<String> {
        self.days_until(today).map(|days| {
            if days <= 0 {
                "今天".to_string()
            } else {
                format!("{days}天后")
            }
        })
    }

    /// 标记为已完成；已完成的记录不再变化
    pub fn completed(&self) -> Option<Self> {
        if self.status == CheckupStatus::Completed {
            return None;
        }
        Some(Self {
            status: CheckupStatus::Completed,
            ..self.clone()
        })
    }

    pub fn with_reminder_toggled(&self) -> Self {
        Self {
            reminder: self.reminder.toggled(),
            ..self.clone()
        }
    }
}

impl Record for Checkup {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Searchable for Checkup {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.doctor.as_str(),
            self.department.as_str(),
            self.hospital.as_str(),
            self.purpose.as_str(),
        ]
    }
}

impl Classified for Checkup {
    type Status = CheckupStatus;

    fn status(&self, _ctx: &ReadContext) -> CheckupStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkup() -> Checkup {
        Checkup::new("2", "李医生", "眼科", "市眼科医院", "2025-10-25", "14:30", "视力检查")
            .unwrap()
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let c = checkup();
        assert_eq!(c.reminder, ReminderToggle::Disabled);

        let once = c.with_reminder_toggled();
        assert!(once.reminder.is_enabled());

        let twice = once.with_reminder_toggled();
        assert_eq!(twice, c);
    }

    #[test]
    fn test_completion() {
        let c = checkup();
        let done = c.completed().unwrap();
        assert_eq!(done.status, CheckupStatus::Completed);
        assert_eq!(done.purpose, c.purpose);
        assert!(done.completed().is_none());

        let missed = checkup().with_status(CheckupStatus::Missed);
        assert_eq!(
            missed.completed().map(|c| c.status),
            Some(CheckupStatus::Completed)
        );
    }

    #[test]
    fn test_countdown_and_urgency() {
        let c = checkup();
        let day = |d: &str| crate::records::parse_date(d).unwrap();

        // 2025-10-25 的复查
        assert_eq!(c.days_until(day("2025-10-21")), Some(4));
        assert!(!c.is_urgent(day("2025-10-21")));
        assert_eq!(c.countdown(day("2025-10-21")).as_deref(), Some("4天后"));

        assert_eq!(c.days_until(day("2025-10-22")), Some(3));
        assert!(c.is_urgent(day("2025-10-22")));

        assert_eq!(c.countdown(day("2025-10-25")).as_deref(), Some("今天"));
        assert_eq!(c.countdown(day("2025-10-27")).as_deref(), Some("今天"));
        assert!(c.is_urgent(day("2025-10-27")));
    }

    #[test]
    fn test_finished_checkup_has_no_countdown() {
        let today = crate::records::parse_date("2025-10-24").unwrap();
        for status in [CheckupStatus::Completed, CheckupStatus::Missed] {
            let c = checkup().with_status(status);
            assert_eq!(c.days_until(today), None);
            assert_eq!(c.countdown(today), None);
            assert!(!c.is_urgent(today));
        }
    }
}
