//! 健康指标
//!
//! 两种数据：图表用的时间序列（日期标签 + 数值），以及逐条的测量记录。
//! 趋势不保存，读取时由序列计算。

use super::{parse_date, parse_time, Record, RecordId};
use crate::error::HealthResult;
use crate::store::{Classified, ReadContext, Searchable};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// 最新值与序列均值的相对偏差在此范围内视为平稳
const STABLE_BAND: f64 = 0.02;

labeled_enum! {
    /// 指标类型
    pub enum MetricKind {
        BloodPressure => ("bloodPressure", "血压"),
        HeartRate => ("heartRate", "心率"),
        BloodSugar => ("bloodSugar", "血糖"),
        BodyTemp => ("bodyTemp", "体温"),
    }
}

impl MetricKind {
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::BloodPressure => "mmHg",
            MetricKind::HeartRate => "bpm",
            MetricKind::BloodSugar => "mmol/L",
            MetricKind::BodyTemp => "°C",
        }
    }
}

labeled_enum! {
    /// 变化趋势
    pub enum Trend {
        Up => ("up", "上升"),
        Down => ("down", "下降"),
        Stable => ("stable", "平稳"),
    }
}

/// 序列中的一个点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// 日期标签，如 "10/16"
    pub label: String,
    pub value: f64,
}

impl MetricSample {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// 序列统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// 单一指标的时间序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub kind: MetricKind,
    samples: Vec<MetricSample>,
}

impl MetricSeries {
    pub fn new(kind: MetricKind, samples: Vec<MetricSample>) -> Self {
        Self { kind, samples }
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.last()
    }

    pub fn stats(&self) -> Option<SeriesStats> {
        let first = self.samples.first()?.value;
        let (min, max, sum) = self
            .samples
            .iter()
            .fold((first, first, 0.0), |(min, max, sum), s| {
                (min.min(s.value), max.max(s.value), sum + s.value)
            });
        Some(SeriesStats {
            min,
            max,
            mean: sum / self.samples.len() as f64,
        })
    }

    /// 最新值相对序列均值的走向
    pub fn trend(&self) -> Trend {
        let (Some(latest), Some(stats)) = (self.latest(), self.stats()) else {
            return Trend::Stable;
        };
        if stats.mean == 0.0 {
            return Trend::Stable;
        }
        let deviation = (latest.value - stats.mean) / stats.mean.abs();
        if deviation > STABLE_BAND {
            Trend::Up
        } else if deviation < -STABLE_BAND {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

/// 一条测量记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReading {
    pub id: RecordId,
    pub kind: MetricKind,
    /// 原始读数，血压为 "120/80" 这样的文本
    pub value: String,
    pub unit: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
}

impl HealthReading {
    /// 单位取指标默认单位
    pub fn new(
        id: impl Into<RecordId>,
        kind: MetricKind,
        value: impl Into<String>,
        date: &str,
        time: &str,
    ) -> HealthResult<Self> {
        Ok(Self {
            id: id.into(),
            kind,
            value: value.into(),
            unit: kind.unit().to_string(),
            date: parse_date(date)?,
            time: parse_time(time)?,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn measured_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl Record for HealthReading {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Searchable for HealthReading {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.kind.label()];
        if let Some(notes) = &self.notes {
            fields.push(notes.as_str());
        }
        fields
    }
}

impl Classified for HealthReading {
    type Status = MetricKind;

    fn status(&self, _ctx: &ReadContext) -> MetricKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(kind: MetricKind, values: &[f64]) -> MetricSeries {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, v)| MetricSample::new(format!("10/{}", 16 + i), *v))
            .collect();
        MetricSeries::new(kind, samples)
    }

    #[test]
    fn test_stats() {
        let s = series(MetricKind::HeartRate, &[70.0, 75.0, 72.0, 78.0, 73.0, 71.0, 72.0]);
        let stats = s.stats().unwrap();
        assert_eq!(stats.min, 70.0);
        assert_eq!(stats.max, 78.0);
        assert!((stats.mean - 73.0).abs() < 1e-9);
        assert_eq!(s.latest().unwrap().label, "10/22");
    }

    #[test]
    fn test_trend() {
        let sugar = series(MetricKind::BloodSugar, &[5.5, 5.8, 5.4, 5.6, 5.3, 5.2, 5.2]);
        assert_eq!(sugar.trend(), Trend::Down);

        let pressure = series(
            MetricKind::BloodPressure,
            &[118.0, 122.0, 120.0, 125.0, 121.0, 119.0, 120.0],
        );
        assert_eq!(pressure.trend(), Trend::Stable);

        let rising = series(MetricKind::HeartRate, &[60.0, 62.0, 80.0]);
        assert_eq!(rising.trend(), Trend::Up);

        assert_eq!(series(MetricKind::BodyTemp, &[]).trend(), Trend::Stable);
        assert!(series(MetricKind::BodyTemp, &[]).stats().is_none());
    }

    #[test]
    fn test_reading_defaults_unit() {
        let reading = HealthReading::new("3", MetricKind::BloodSugar, "5.2", "2025-10-22", "08:30")
            .unwrap()
            .with_notes("空腹");
        assert_eq!(reading.unit, "mmol/L");
        assert_eq!(reading.search_fields(), vec!["血糖", "空腹"]);
    }
}
