//! 药品库存
//!
//! 库存状态不保存在记录里，每次读取时根据数量、有效期和当天日期计算。

use super::{parse_date, Record, RecordId};
use crate::error::HealthResult;
use crate::store::{Classified, ReadContext, Searchable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// 库存状态
    pub enum StockStatus {
        Normal => ("normal", "充足"),
        Low => ("low", "不足"),
        Expired => ("expired", "已过期"),
    }
}

/// 一种在库药品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: RecordId,
    pub name: String,
    /// 剂型，如 "胶囊"
    pub dosage_form: String,
    /// 规格，如 "250mg"
    pub dosage: String,
    pub quantity: u32,
    /// 计量单位，如 "粒"
    pub unit: String,
    pub expiry_date: NaiveDate,
    pub notes: Option<String>,
}

impl InventoryItem {
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        dosage_form: impl Into<String>,
        dosage: impl Into<String>,
        quantity: u32,
        unit: impl Into<String>,
        expiry_date: &str,
    ) -> HealthResult<Self> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            dosage_form: dosage_form.into(),
            dosage: dosage.into(),
            quantity,
            unit: unit.into(),
            expiry_date: parse_date(expiry_date)?,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 有效期当天仍可使用
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// 距离过期的天数，已过期为负数
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    /// 过期优先于库存不足
    pub fn stock_status(&self, ctx: &ReadContext) -> StockStatus {
        if self.is_expired_on(ctx.today) {
            StockStatus::Expired
        } else if self.quantity < ctx.low_stock_threshold {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }

    /// 调整数量，下限为 0
    pub fn adjusted(&self, delta: i64) -> Self {
        let quantity = (i64::from(self.quantity) + delta).clamp(0, i64::from(u32::MAX)) as u32;
        Self {
            quantity,
            ..self.clone()
        }
    }
}

impl Record for InventoryItem {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Searchable for InventoryItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.dosage_form.as_str()]
    }
}

impl Classified for InventoryItem {
    type Status = StockStatus;

    fn status(&self, ctx: &ReadContext) -> StockStatus {
        self.stock_status(ctx)
    }
}
