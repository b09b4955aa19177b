//! 筛选与搜索
//!
//! 状态筛选和关键词搜索取交集。筛选是纯函数，只读取集合快照。

use super::ReadContext;
use std::str::FromStr;

/// "全部"哨兵值
pub const ALL: &str = "all";

/// 参与关键词搜索的文本字段
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// 不区分大小写的子串匹配；`needle` 需已转小写，空串匹配所有记录
    fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// 可按状态（或分类）筛选的记录
pub trait Classified {
    type Status: PartialEq;

    fn status(&self, ctx: &ReadContext) -> Self::Status;
}

/// 状态筛选条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter<S> {
    /// 不筛选
    All,
    /// 状态必须完全相等
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S> From<S> for StatusFilter<S> {
    fn from(status: S) -> Self {
        StatusFilter::Only(status)
    }
}

impl<S: FromStr> StatusFilter<S> {
    /// 解析界面传入的筛选值
    ///
    /// 空串、"all" 以及无法识别的值都按"全部"处理，避免静默得到空列表。
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
            return StatusFilter::All;
        }
        match raw.parse::<S>() {
            Ok(status) => StatusFilter::Only(status),
            Err(_) => {
                tracing::debug!(filter = raw, "未知的状态筛选值，按全部处理");
                StatusFilter::All
            }
        }
    }
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn matches(&self, status: &S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

/// 按状态和关键词筛选，保持原有顺序
pub fn filter<T>(
    items: &[T],
    status: &StatusFilter<T::Status>,
    search: &str,
    ctx: &ReadContext,
) -> Vec<T>
where
    T: Classified + Searchable + Clone,
{
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|item| status.matches(&item.status(ctx)) && item.matches_lowercase(&needle))
        .cloned()
        .collect()
}
