//! 按插入顺序保存的记录集合

use crate::records::{Record, RecordId};
use serde::Serialize;

/// 记录集合
///
/// 顺序即插入顺序，集合本身从不重排；替换保持原位置和原标识。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前快照
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    /// 追加到末尾；标识已存在时不插入并返回 false
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(item.id()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// 用 `f` 生成的新记录替换同标识的记录
    ///
    /// 记录不存在，或 `f` 返回 `None` 时集合不变，返回 false。
    pub fn replace_with<F>(&mut self, id: &RecordId, f: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let Some(slot) = self.items.iter_mut().find(|item| item.id() == id) else {
            return false;
        };
        match f(slot) {
            Some(updated) => {
                debug_assert_eq!(updated.id(), id, "替换不能改变记录标识");
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// 按标识删除
    pub fn remove(&mut self, id: &RecordId) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}

impl<T: Record> From<Vec<T>> for Collection<T> {
    /// 重复标识只保留第一条
    fn from(items: Vec<T>) -> Self {
        let mut collection = Self::new();
        for item in items {
            collection.insert(item);
        }
        collection
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
