//! 读取上下文
//!
//! 派生状态（如库存是否过期）依赖"今天"和阈值，这里把它们显式传入。

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// 日期来源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clock {
    /// 本地系统日期
    #[default]
    System,
    /// 固定日期（测试、回放）
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

impl From<Option<NaiveDate>> for Clock {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map(Clock::Fixed).unwrap_or_default()
    }
}

/// 一次读取所用的上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadContext {
    pub today: NaiveDate,
    /// 数量低于该值视为库存不足
    pub low_stock_threshold: u32,
}
