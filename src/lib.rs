//! Med Keeper - 个人用药管理
//!
//! 用药提醒、药品库存、复查预约、门诊历史和健康指标的内存数据层，
//! 以及一个带延迟回复的健康咨询会话。

#[macro_use]
mod macros;

pub mod calendar;
pub mod config;
pub mod consultation;
pub mod error;
pub mod records;
pub mod report;
pub mod seed;
pub mod session;
pub mod stats;
pub mod store;

pub use consultation::{ConsultationSession, ConsultationSettings};
pub use error::{HealthError, HealthResult};
pub use records::RecordId;
pub use session::SessionContext;
pub use store::{HealthStore, StatusFilter, StoreSettings};

pub use anyhow::Result;
