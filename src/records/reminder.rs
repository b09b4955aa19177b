//! 用药提醒

use super::{parse_date, parse_time, Record, RecordId};
use crate::error::HealthResult;
use crate::store::{Classified, ReadContext, Searchable};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// 当日服药状态
    pub enum ReminderStatus {
        Pending => ("pending", "待服用"),
        Taken => ("taken", "已服用"),
        Missed => ("missed", "已错过"),
    }
}

/// 一次计划中的服药
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationReminder {
    pub id: RecordId,
    /// 药品名称
    pub name: String,
    pub time: NaiveTime,
    pub date: NaiveDate,
    /// 剂量，如 "1片"
    pub dosage: String,
    pub status: ReminderStatus,
    pub notes: Option<String>,
}

impl MedicationReminder {
    /// 新建待服用提醒
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        date: &str,
        time: &str,
        dosage: impl Into<String>,
    ) -> HealthResult<Self> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            time: parse_time(time)?,
            date: parse_date(date)?,
            dosage: dosage.into(),
            status: ReminderStatus::Pending,
            notes: None,
        })
    }

    pub fn with_status(mut self, status: ReminderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// 状态迁移，只允许 pending → taken / missed
    ///
    /// 不允许的迁移返回 `None`，调用方据此视为空操作。
    pub fn transition(&self, to: ReminderStatus) -> Option<Self> {
        if self.status != ReminderStatus::Pending || to == ReminderStatus::Pending {
            return None;
        }
        Some(Self {
            status: to,
            ..self.clone()
        })
    }
}

impl Record for MedicationReminder {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Searchable for MedicationReminder {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(notes) = &self.notes {
            fields.push(notes.as_str());
        }
        fields
    }
}

impl Classified for MedicationReminder {
    type Status = ReminderStatus;

    fn status(&self, _ctx: &ReadContext) -> ReminderStatus {
        self.status
    }
}
