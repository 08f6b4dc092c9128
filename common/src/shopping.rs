//! 買い物リスト
//!
//! 挿入順を保持する集合。既に存在する名前の追加は無視する。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    items: Vec<String>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未登録の項目だけを入力順に末尾へ追加し、追加件数を返す
    pub fn add_all<I, S>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.items.len();
        for item in items {
            let item = item.into();
            if !self.contains(&item) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    /// 同名の項目をすべて削除
    pub fn remove(&mut self, item: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i != item);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    pub fn contains_all<S: AsRef<str>>(&self, items: &[S]) -> bool {
        items.iter().all(|i| self.contains(i.as_ref()))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
