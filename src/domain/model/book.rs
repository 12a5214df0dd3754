use serde::{Deserialize, Serialize};

/// 蔵書1冊分のレコード。IDは持たず、titleが事実上のキーになる。
///
/// ファイル上のフィールドは `title`, `author`, `year`, `pages` の4つだけ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Book {
    title: String,
    author: String,
    year: i64,
    pages: i64,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i64, pages: i64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            pages,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn pages(&self) -> i64 {
        self.pages
    }

    /// titleまたはauthorにkeywordを含むか（大文字小文字を区別しない）。
    /// keywordは小文字化済みであること。
    pub(crate) fn mentions(&self, lowered_keyword: &str) -> bool {
        self.title.to_lowercase().contains(lowered_keyword)
            || self.by_author(lowered_keyword)
    }

    /// authorにkeywordを含むか。keywordは小文字化済みであること。
    pub(crate) fn by_author(&self, lowered_keyword: &str) -> bool {
        self.author.to_lowercase().contains(lowered_keyword)
    }
}
