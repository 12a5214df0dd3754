//! Read-only queries over a [`Catalog`]. Nothing here mutates the catalog
//! or touches storage.

mod recommend;
mod report;

use std::fmt;
use std::str::FromStr;

use crate::domain::model::book::Book;
use crate::domain::model::catalog::Catalog;

pub use recommend::{recommend, Recommendation, RecommendationBasis};
pub use recommend::{MAX_SIMILAR_TITLES, SIMILARITY_CUTOFF};
pub use report::{report, Summary};

/// ソートキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Year,
    Pages,
    /// 大文字小文字を区別しない辞書順
    Title,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "pages" => Ok(Self::Pages),
            "title" => Ok(Self::Title),
            other => Err(format!(
                "Unknown sort key: '{other}'. Use: year, pages, title"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Year => "year",
            Self::Pages => "pages",
            Self::Title => "title",
        };
        f.write_str(name)
    }
}

/// titleかauthorにkeywordを含むBookをCatalog順で返す。
/// 空のkeywordは「検索しない」扱いで、常に空を返す。
pub fn search<'a>(catalog: &'a Catalog, keyword: &str) -> Vec<&'a Book> {
    if keyword.is_empty() {
        return Vec::new();
    }
    let keyword = keyword.to_lowercase();
    catalog.iter().filter(|b| b.mentions(&keyword)).collect()
}

/// 昇順の安定ソート。同値の要素は元の相対順を保つ。
pub fn sort(catalog: &Catalog, key: SortKey) -> Vec<&Book> {
    let mut books: Vec<&Book> = catalog.iter().collect();
    match key {
        SortKey::Year => books.sort_by_key(|b| b.year()),
        SortKey::Pages => books.sort_by_key(|b| b.pages()),
        SortKey::Title => books.sort_by_cached_key(|b| b.title().to_lowercase()),
    }
    books
}
