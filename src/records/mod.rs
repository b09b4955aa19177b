//! 记录类型
//!
//! 每个领域一类记录：用药提醒、药品库存、复查、门诊历史、健康指标。
//! 记录按约定不可变，修改时整体替换。

pub mod checkup;
pub mod inventory;
pub mod metric;
pub mod reminder;
pub mod visit;

pub use checkup::{Checkup, CheckupStatus, ReminderToggle};
pub use inventory::{InventoryItem, StockStatus};
pub use metric::{HealthReading, MetricKind, MetricSample, MetricSeries, SeriesStats, Trend};
pub use reminder::{MedicationReminder, ReminderStatus};
pub use visit::MedicalVisit;

use crate::error::{HealthError, HealthResult};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 记录标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 生成新的随机标识
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 可按标识查找的记录
pub trait Record: Clone {
    fn id(&self) -> &RecordId;
}

/// 枚举解析失败
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("未知的 {kind} 取值: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// 解析 `YYYY-MM-DD`
pub fn parse_date(value: &str) -> HealthResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| HealthError::InvalidDate {
        value: value.to_string(),
    })
}

/// 解析 `HH:MM`
pub fn parse_time(value: &str) -> HealthResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| HealthError::InvalidTime {
        value: value.to_string(),
    })
}

/// 时间的显示格式（不带秒）
pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_and_time() {
        let date = parse_date("2025-10-22").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 10, 22).unwrap());

        let time = parse_time("09:30").unwrap();
        assert_eq!(format_time(&time), "09:30");

        assert!(matches!(
            parse_date("2025/10/22"),
            Err(HealthError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_time("25:00"),
            Err(HealthError::InvalidTime { .. })
        ));
    }

    #[test]
    fn test_record_id() {
        let id = RecordId::from("5");
        assert_eq!(id.as_str(), "5");
        assert_eq!(id.to_string(), "5");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"5\"");

        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    #[test]
    fn test_labeled_enum_parsing() {
        assert_eq!("TAKEN".parse::<ReminderStatus>(), Ok(ReminderStatus::Taken));
        assert_eq!(
            "heartRate".parse::<MetricKind>(),
            Ok(MetricKind::HeartRate)
        );

        let err = "finished".parse::<CheckupStatus>().unwrap_err();
        assert_eq!(err.kind, "CheckupStatus");
        assert_eq!(err.value, "finished");
    }
}
