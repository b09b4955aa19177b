//! 健康咨询会话
//!
//! 用户消息同步追加；助手回复在固定延迟后由定时任务追加。
//! 会话关闭或被丢弃时取消所有未送达的回复，不会再修改已释放的状态。

pub mod replies;

use crate::config::Config;
use crate::error::{HealthError, HealthResult};
use crate::records::{Record, RecordId};
use crate::store::Collection;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::AbortHandle;

labeled_enum! {
    /// 消息发送方
    pub enum Speaker {
        User => ("user", "我"),
        Assistant => ("ai", "健康助手"),
    }
}

labeled_enum! {
    /// 问题类别
    pub enum MessageCategory {
        Drug => ("drug", "药物咨询"),
        Health => ("health", "健康咨询"),
        General => ("general", "综合"),
    }
}

/// 一条聊天消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: RecordId,
    pub text: String,
    pub speaker: Speaker,
    pub timestamp: DateTime<Utc>,
    pub liked: bool,
    pub category: Option<MessageCategory>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            text: text.into(),
            speaker: Speaker::User,
            timestamp: Utc::now(),
            liked: false,
            category: None,
        }
    }

    pub fn assistant(text: impl Into<String>, category: MessageCategory) -> Self {
        Self {
            id: RecordId::generate(),
            text: text.into(),
            speaker: Speaker::Assistant,
            timestamp: Utc::now(),
            liked: false,
            category: Some(category),
        }
    }
}

impl Record for ChatMessage {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// 会话设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsultationSettings {
    /// 回复延迟
    pub reply_delay: Duration,
    /// 单条消息最大字符数
    pub max_message_len: usize,
}

impl Default for ConsultationSettings {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(1000),
            max_message_len: 500,
        }
    }
}

impl From<&Config> for ConsultationSettings {
    fn from(config: &Config) -> Self {
        Self {
            reply_delay: Duration::from_millis(config.consultation.reply_delay_ms),
            max_message_len: config.consultation.max_message_len,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    messages: Collection<ChatMessage>,
    /// 触发消息 ID -> 待送达回复的任务
    pending: HashMap<RecordId, AbortHandle>,
    closed: bool,
}

/// 咨询会话
pub struct ConsultationSession {
    state: Arc<Mutex<SessionState>>,
    /// 回复送达或会话关闭时通知
    settled: Arc<Notify>,
    settings: ConsultationSettings,
}

impl ConsultationSession {
    /// 新会话，带一条开场白
    pub fn new(settings: ConsultationSettings) -> Self {
        let mut state = SessionState::default();
        state.messages.insert(ChatMessage::assistant(
            replies::WELCOME_MESSAGE,
            MessageCategory::General,
        ));
        Self {
            state: Arc::new(Mutex::new(state)),
            settled: Arc::new(Notify::new()),
            settings,
        }
    }

    pub fn settings(&self) -> &ConsultationSettings {
        &self.settings
    }

    /// 消息快照
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().messages.items().to_vec()
    }

    /// 尚未送达的回复数
    pub fn pending_replies(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// 发送一条用户消息并安排一条回复
    ///
    /// 去掉首尾空白后为空时不做任何事，返回 `Ok(None)`；
    /// 否则返回用户消息的 ID。必须在 tokio 运行时内调用。
    pub fn send(&self, text: &str) -> HealthResult<Option<RecordId>> {
        let question = text.trim();
        if question.is_empty() {
            tracing::trace!("忽略空消息");
            return Ok(None);
        }

        let len = question.chars().count();
        if len > self.settings.max_message_len {
            return Err(HealthError::MessageTooLong {
                len,
                max: self.settings.max_message_len,
            });
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| HealthError::NoRuntime)?;

        // 持锁完成追加和登记，回复任务拿到锁之前一定能看到自己的登记
        let mut state = self.state.lock();
        if state.closed {
            return Err(HealthError::SessionClosed);
        }

        let message = ChatMessage::user(question);
        let trigger = message.id.clone();
        state.messages.insert(message);

        let task = runtime.spawn(deliver_reply(
            Arc::clone(&self.state),
            Arc::clone(&self.settled),
            trigger.clone(),
            question.to_string(),
            self.settings.reply_delay,
        ));
        state.pending.insert(trigger.clone(), task.abort_handle());

        tracing::info!(
            message_id = %trigger,
            delay_ms = self.settings.reply_delay.as_millis() as u64,
            "已发送消息，等待回复"
        );
        Ok(Some(trigger))
    }

    /// 切换点赞
    pub fn toggle_like(&self, id: &RecordId) -> bool {
        self.state.lock().messages.replace_with(id, |m| {
            Some(ChatMessage {
                liked: !m.liked,
                ..m.clone()
            })
        })
    }

    /// 删除消息；确认由调用方负责
    pub fn delete(&self, id: &RecordId) -> bool {
        let removed = self.state.lock().messages.remove(id).is_some();
        if !removed {
            tracing::trace!(message_id = %id, "要删除的消息不存在");
        }
        removed
    }

    /// 关闭会话并取消所有未送达的回复
    pub fn close(&self) {
        let cancelled = {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            let cancelled = state.pending.len();
            for (_, handle) in state.pending.drain() {
                handle.abort();
            }
            cancelled
        };
        self.settled.notify_waiters();
        tracing::info!(cancelled, "咨询会话已关闭");
    }

    /// 等待所有已安排的回复送达（或会话关闭）
    pub async fn wait_for_replies(&self) {
        loop {
            let notified = self.settled.notified();
            if self.pending_replies() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Default for ConsultationSession {
    fn default() -> Self {
        Self::new(ConsultationSettings::default())
    }
}

impl Drop for ConsultationSession {
    fn drop(&mut self) {
        self.close();
    }
}

async fn deliver_reply(
    state: Arc<Mutex<SessionState>>,
    settled: Arc<Notify>,
    trigger: RecordId,
    question: String,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    let category = replies::reply_category(&question);
    let reply = ChatMessage::assistant(replies::reply_for(&question), category);
    {
        let mut state = state.lock();
        // 已关闭或已取消的会话不再写入
        if state.closed || state.pending.remove(&trigger).is_none() {
            return;
        }
        tracing::debug!(reply_to = %trigger, category = %category, "回复已送达");
        state.messages.insert(reply);
    }
    settled.notify_waiters();
}
