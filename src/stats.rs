//! 派生统计
//!
//! 全部是对当前集合的纯函数，每次调用重新计算，不做缓存。

use crate::records::{
    Checkup, CheckupStatus, HealthReading, InventoryItem, MedicalVisit, MedicationReminder,
    MetricKind, MetricSeries, ReminderStatus, StockStatus, Trend,
};
use crate::store::{Classified, ReadContext};
use chrono::NaiveDateTime;
use serde::Serialize;

/// 按键计数，结果按键首次出现的顺序排列
pub fn count_by<T, K, F>(items: &[T], key: F) -> Vec<(K, usize)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        let k = key(item);
        match counts.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, n)) => *n += 1,
            None => counts.push((k, 1)),
        }
    }
    counts
}

/// 按状态计数
pub fn count_by_status<T: Classified>(items: &[T], ctx: &ReadContext) -> Vec<(T::Status, usize)> {
    count_by(items, |item| item.status(ctx))
}

fn count_of<K: PartialEq>(counts: &[(K, usize)], key: &K) -> usize {
    counts
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// 用药提醒统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReminderStats {
    pub total: usize,
    pub pending: usize,
    pub taken: usize,
    pub missed: usize,
}

impl ReminderStats {
    /// 依从率：已服用 / (已服用 + 已错过)，没有已结束的提醒时为 `None`
    pub fn adherence(&self) -> Option<f64> {
        let settled = self.taken + self.missed;
        (settled > 0).then(|| self.taken as f64 / settled as f64)
    }
}

pub fn reminder_stats(reminders: &[MedicationReminder]) -> ReminderStats {
    let counts = count_by(reminders, |r| r.status);
    ReminderStats {
        total: reminders.len(),
        pending: count_of(&counts, &ReminderStatus::Pending),
        taken: count_of(&counts, &ReminderStatus::Taken),
        missed: count_of(&counts, &ReminderStatus::Missed),
    }
}

/// 库存统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub total: usize,
    pub normal: usize,
    pub low: usize,
    pub expired: usize,
}

pub fn inventory_stats(items: &[InventoryItem], ctx: &ReadContext) -> InventoryStats {
    let counts = count_by_status(items, ctx);
    InventoryStats {
        total: items.len(),
        normal: count_of(&counts, &StockStatus::Normal),
        low: count_of(&counts, &StockStatus::Low),
        expired: count_of(&counts, &StockStatus::Expired),
    }
}

/// 复查统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckupStats {
    pub total: usize,
    pub upcoming: usize,
    pub completed: usize,
    pub missed: usize,
    pub reminders_enabled: usize,
}

pub fn checkup_stats(checkups: &[Checkup]) -> CheckupStats {
    let counts = count_by(checkups, |c| c.status);
    CheckupStats {
        total: checkups.len(),
        upcoming: count_of(&counts, &CheckupStatus::Upcoming),
        completed: count_of(&counts, &CheckupStatus::Completed),
        missed: count_of(&counts, &CheckupStatus::Missed),
        reminders_enabled: checkups.iter().filter(|c| c.reminder.is_enabled()).count(),
    }
}

/// 门诊统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitStats {
    pub total: usize,
    /// 就诊科室数
    pub departments: usize,
    pub by_department: Vec<(String, usize)>,
}

pub fn visit_stats(visits: &[MedicalVisit]) -> VisitStats {
    let by_department = count_by(visits, |v| v.department.clone());
    VisitStats {
        total: visits.len(),
        departments: by_department.len(),
        by_department,
    }
}

/// 指标卡片
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub kind: MetricKind,
    pub value: String,
    pub unit: String,
    pub trend: Trend,
    /// 最近一次测量时间，只有序列数据时为空
    pub measured_at: Option<NaiveDateTime>,
}

/// 每种有数据的指标一张卡片
///
/// 数值取最近的测量记录，没有测量记录时取序列最后一个点；趋势由序列计算。
pub fn metric_summaries(readings: &[HealthReading], series: &[MetricSeries]) -> Vec<MetricSummary> {
    MetricKind::ALL
        .iter()
        .filter_map(|kind| {
            let latest = readings
                .iter()
                .filter(|r| r.kind == *kind)
                .max_by_key(|r| r.measured_at());
            let series = series.iter().find(|s| s.kind == *kind);
            let trend = series.map(MetricSeries::trend).unwrap_or(Trend::Stable);

            match (latest, series.and_then(MetricSeries::latest)) {
                (Some(reading), _) => Some(MetricSummary {
                    kind: *kind,
                    value: reading.value.clone(),
                    unit: reading.unit.clone(),
                    trend,
                    measured_at: Some(reading.measured_at()),
                }),
                (None, Some(sample)) => Some(MetricSummary {
                    kind: *kind,
                    value: sample.value.to_string(),
                    unit: kind.unit().to_string(),
                    trend,
                    measured_at: None,
                }),
                (None, None) => None,
            }
        })
        .collect()
}

/// 个人中心的计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileOverview {
    /// 待服用提醒数
    pub medication_reminders: usize,
    pub upcoming_checkups: usize,
    /// 门诊记录数
    pub completed_visits: usize,
    pub inventory_items: usize,
}

pub fn profile_overview(
    reminders: &[MedicationReminder],
    checkups: &[Checkup],
    visits: &[MedicalVisit],
    inventory: &[InventoryItem],
) -> ProfileOverview {
    ProfileOverview {
        medication_reminders: reminders
            .iter()
            .filter(|r| r.status == ReminderStatus::Pending)
            .count(),
        upcoming_checkups: checkups
            .iter()
            .filter(|c| c.status == CheckupStatus::Upcoming)
            .count(),
        completed_visits: visits.len(),
        inventory_items: inventory.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{MetricSample, ReminderToggle};

    #[test]
    fn test_count_by_keeps_first_appearance_order() {
        let words = ["眼科", "内科", "眼科", "骨科", "内科", "眼科"];
        let counts = count_by(&words, |w| *w);
        assert_eq!(counts, vec![("眼科", 3), ("内科", 2), ("骨科", 1)]);
        assert!(count_by::<&str, &str, _>(&[], |w| *w).is_empty());
    }

    #[test]
    fn test_reminder_stats_and_adherence() {
        let base = MedicationReminder::new("1", "维生素C", "2025-10-22", "09:30", "1片").unwrap();
        let reminders = vec![
            base.clone(),
            MedicationReminder {
                id: "2".into(),
                ..base.clone()
            }
            .with_status(ReminderStatus::Taken),
            MedicationReminder {
                id: "3".into(),
                ..base.clone()
            }
            .with_status(ReminderStatus::Taken),
            MedicationReminder {
                id: "4".into(),
                ..base.clone()
            }
            .with_status(ReminderStatus::Missed),
        ];
        let stats = reminder_stats(&reminders);
        assert_eq!(
            stats,
            ReminderStats {
                total: 4,
                pending: 1,
                taken: 2,
                missed: 1
            }
        );
        let adherence = stats.adherence().unwrap();
        assert!((adherence - 2.0 / 3.0).abs() < 1e-9);

        assert!(reminder_stats(&[base]).adherence().is_none());
    }

    #[test]
    fn test_checkup_stats_counts_enabled_reminders() {
        let c = Checkup::new("1", "张医生", "内科", "市第一医院", "2025-10-28", "10:00", "高血压复诊")
            .unwrap();
        let checkups = vec![
            c.clone().with_reminder(ReminderToggle::Enabled),
            Checkup {
                id: "2".into(),
                ..c.clone()
            }
            .with_status(CheckupStatus::Missed),
        ];
        let stats = checkup_stats(&checkups);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.upcoming, 1);
        assert_eq!(stats.missed, 1);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.reminders_enabled, 1);
    }

    #[test]
    fn test_metric_summaries() {
        let readings = vec![
            HealthReading::new("1", MetricKind::BloodPressure, "120/80", "2025-10-22", "08:30")
                .unwrap(),
            HealthReading::new("5", MetricKind::BloodPressure, "118/78", "2025-10-21", "18:00")
                .unwrap(),
        ];
        let series = vec![MetricSeries::new(
            MetricKind::HeartRate,
            vec![MetricSample::new("10/21", 71.0), MetricSample::new("10/22", 72.0)],
        )];

        let summaries = metric_summaries(&readings, &series);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].kind, MetricKind::BloodPressure);
        assert_eq!(summaries[0].value, "120/80");
        assert_eq!(summaries[0].unit, "mmHg");
        assert_eq!(summaries[1].kind, MetricKind::HeartRate);
        assert_eq!(summaries[1].value, "72");
        assert!(summaries[1].measured_at.is_none());
    }
}
