//! 示例数据
//!
//! 应用启动时载入的初始记录，命令行各子命令都基于这份数据。

use crate::error::HealthResult;
use crate::records::{
    Checkup, CheckupStatus, HealthReading, InventoryItem, MedicalVisit, MedicationReminder,
    MetricKind, MetricSample, MetricSeries, ReminderStatus, ReminderToggle,
};
use crate::store::{HealthStore, StoreRecords, StoreSettings};

/// 图表横轴标签
const SERIES_LABELS: [&str; 7] = ["10/16", "10/17", "10/18", "10/19", "10/20", "10/21", "10/22"];

fn series(kind: MetricKind, values: [f64; 7]) -> MetricSeries {
    let samples = SERIES_LABELS
        .iter()
        .zip(values)
        .map(|(label, value)| MetricSample::new(*label, value))
        .collect();
    MetricSeries::new(kind, samples)
}

fn reminders() -> HealthResult<Vec<MedicationReminder>> {
    Ok(vec![
        MedicationReminder::new("1", "维生素C", "2025-10-22", "09:30", "1片")?.with_notes("随餐服用"),
        MedicationReminder::new("2", "钙片", "2025-10-22", "14:00", "2片")?,
        MedicationReminder::new("3", "胃药", "2025-10-22", "19:00", "1粒")?,
        MedicationReminder::new("4", "降压药", "2025-10-23", "08:00", "1片")?,
        MedicationReminder::new("5", "降糖药", "2025-10-23", "20:00", "1片")?,
        MedicationReminder::new("6", "抗生素", "2025-10-21", "09:00", "2片")?
            .with_status(ReminderStatus::Taken),
        MedicationReminder::new("7", "退烧药", "2025-10-20", "15:30", "1片")?
            .with_status(ReminderStatus::Missed)
            .with_notes("体温超过38.5℃时服用"),
    ])
}

fn inventory() -> HealthResult<Vec<InventoryItem>> {
    Ok(vec![
        InventoryItem::new("1", "维生素C", "片剂", "100mg", 30, "片", "2026-12-31")?
            .with_notes("每日一次，每次一片"),
        InventoryItem::new("2", "钙片", "咀嚼片", "500mg", 5, "片", "2026-06-30")?,
        InventoryItem::new("3", "胃药", "胶囊", "20mg", 14, "粒", "2025-12-15")?.with_notes("饭后服用"),
        InventoryItem::new("4", "布洛芬", "缓释片", "300mg", 8, "片", "2024-10-01")?,
        InventoryItem::new("5", "阿莫西林", "胶囊", "250mg", 2, "粒", "2026-08-31")?,
    ])
}

fn checkups() -> HealthResult<Vec<Checkup>> {
    Ok(vec![
        Checkup::new("1", "张医生", "内科", "市第一医院", "2025-10-28", "10:00", "高血压复诊")?
            .with_notes("记得带上之前的检查报告")
            .with_reminder(ReminderToggle::Enabled),
        Checkup::new("2", "李医生", "眼科", "市眼科医院", "2025-10-25", "14:30", "视力检查")?,
        Checkup::new("3", "王医生", "骨科", "省立医院", "2025-10-20", "09:15", "膝盖复查")?
            .with_notes("需要拍X光片")
            .with_status(CheckupStatus::Completed),
        Checkup::new("4", "刘医生", "口腔科", "口腔医院", "2025-10-18", "16:00", "洗牙")?
            .with_status(CheckupStatus::Missed),
    ])
}

fn visits() -> HealthResult<Vec<MedicalVisit>> {
    Ok(vec![
        MedicalVisit::new(
            "1",
            "2025-10-15",
            "10:30",
            "张医生",
            "内科",
            "市第一医院",
            "原发性高血压",
            "1. 生活方式调整：低盐饮食、适量运动、戒烟限酒\n\
             2. 药物治疗：氨氯地平 5mg 每日一次\n\
             3. 定期监测血压，每月复诊",
        )?
        .with_notes("患者血压控制不佳，建议加强饮食控制"),
        MedicalVisit::new(
            "2",
            "2025-09-20",
            "14:15",
            "李医生",
            "眼科",
            "市眼科医院",
            "轻度近视",
            "1. 定期进行视力检查\n\
             2. 注意用眼卫生，避免长时间使用电子设备\n\
             3. 建议配戴矫正眼镜",
        )?,
        MedicalVisit::new(
            "3",
            "2025-08-05",
            "09:00",
            "王医生",
            "骨科",
            "省立医院",
            "膝关节滑膜炎",
            "1. 休息，避免剧烈运动\n\
             2. 物理治疗：热敷、按摩\n\
             3. 药物治疗：消炎止痛药",
        )?
        .with_notes("2周后复诊评估治疗效果"),
        MedicalVisit::new(
            "4",
            "2025-07-12",
            "16:45",
            "刘医生",
            "口腔科",
            "口腔医院",
            "牙龈炎",
            "1. 口腔清洁：使用漱口水\n\
             2. 饮食调整：避免辛辣刺激性食物\n\
             3. 定期洗牙",
        )?,
    ])
}

fn readings() -> HealthResult<Vec<HealthReading>> {
    Ok(vec![
        HealthReading::new("1", MetricKind::BloodPressure, "120/80", "2025-10-22", "08:30")?,
        HealthReading::new("2", MetricKind::HeartRate, "72", "2025-10-22", "08:30")?,
        HealthReading::new("3", MetricKind::BloodSugar, "5.2", "2025-10-22", "08:30")?
            .with_notes("空腹"),
        HealthReading::new("4", MetricKind::BodyTemp, "36.5", "2025-10-22", "08:30")?,
        HealthReading::new("5", MetricKind::BloodPressure, "118/78", "2025-10-21", "18:00")?,
    ])
}

impl StoreRecords {
    /// 示例记录
    pub fn sample() -> HealthResult<Self> {
        Ok(Self {
            reminders: reminders()?,
            inventory: inventory()?,
            checkups: checkups()?,
            visits: visits()?,
            readings: readings()?,
            series: vec![
                series(
                    MetricKind::BloodPressure,
                    [118.0, 122.0, 120.0, 125.0, 121.0, 119.0, 120.0],
                ),
                series(MetricKind::HeartRate, [70.0, 75.0, 72.0, 78.0, 73.0, 71.0, 72.0]),
                series(MetricKind::BloodSugar, [5.5, 5.8, 5.4, 5.6, 5.3, 5.2, 5.2]),
            ],
        })
    }
}

impl HealthStore {
    /// 载入示例记录的存储
    pub fn with_sample_data(settings: StoreSettings) -> HealthResult<Self> {
        Ok(Self::from_records(settings, StoreRecords::sample()?))
    }
}
