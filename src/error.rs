//! 错误处理
//!
//! 数据层本身没有 I/O，未知记录 ID 一律视为空操作而不是错误。
//! 这里只覆盖输入解析、会话调度和配置相关的失败。

use thiserror::Error;

/// 数据层错误类型
#[derive(Error, Debug)]
pub enum HealthError {
    /// 日期格式错误
    #[error("无效的日期: {value}（应为 YYYY-MM-DD）")]
    InvalidDate { value: String },

    /// 时间格式错误
    #[error("无效的时间: {value}（应为 HH:MM）")]
    InvalidTime { value: String },

    /// 月份格式错误
    #[error("无效的月份: {value}（应为 YYYY-MM）")]
    InvalidMonth { value: String },

    /// 未知的枚举值（状态、指标类型等）
    #[error(transparent)]
    UnknownVariant(#[from] crate::records::UnknownVariant),

    /// 消息过长
    #[error("消息过长: {len} 字符（上限 {max}）")]
    MessageTooLong { len: usize, max: usize },

    /// 当前线程没有 tokio 运行时，无法调度回复
    #[error("没有可用的异步运行时")]
    NoRuntime,

    /// 咨询会话已关闭
    #[error("咨询会话已关闭")]
    SessionClosed,

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 数据层结果类型
pub type HealthResult<T> = Result<T, HealthError>;
