use serde::{Deserialize, Serialize};

use super::coerce;
use super::id::BookId;

/// 追加・更新リクエスト。書籍の可変フィールド一式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub is_complete: bool,
}

impl BookDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        is_complete: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            is_complete,
        }
    }
}

/// 本棚上の1冊。Bookshelfが所有し、Bookshelfを通じて操作する。
///
/// 保存形式のフィールド名は `id`, `title`, `author`, `year`, `isComplete`。
/// 読み込み時は旧形式（`year` が文字列、`isComplete` 欠落）も受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    #[serde(default, deserialize_with = "coerce::text")]
    title: String,
    #[serde(default, deserialize_with = "coerce::text")]
    author: String,
    #[serde(default, deserialize_with = "coerce::year")]
    year: i32,
    #[serde(default, deserialize_with = "coerce::flag")]
    is_complete: bool,
}

impl Book {
    pub fn new(id: BookId, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            year: draft.year,
            is_complete: draft.is_complete,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// タイトルの部分一致（`keyword` は小文字化済みであること）
    pub fn title_contains(&self, keyword: &str) -> bool {
        self.title.to_lowercase().contains(keyword)
    }

    // --- 内部操作（Bookshelf経由でのみ呼ばれる） ---

    pub(crate) fn apply(&mut self, draft: BookDraft) {
        self.title = draft.title;
        self.author = draft.author;
        self.year = draft.year;
        self.is_complete = draft.is_complete;
    }

    pub(crate) fn toggle_completion(&mut self) {
        self.is_complete = !self.is_complete;
    }
}
