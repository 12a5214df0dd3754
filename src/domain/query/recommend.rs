use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::model::book::Book;
use crate::domain::model::catalog::Catalog;
use crate::domain::similarity;

/// 類似タイトルとみなす最小の類似度
pub const SIMILARITY_CUTOFF: f64 = 0.3;
/// 類似タイトル段階で返す最大件数
pub const MAX_SIMILAR_TITLES: usize = 5;

/// どの段階で推薦が決まったか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationBasis {
    /// authorの部分一致
    Author,
    /// titleの類似度
    SimilarTitle,
    /// 該当なし
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub basis: RecommendationBasis,
    pub books: Vec<&'a Book>,
}

impl<'a> Recommendation<'a> {
    fn none() -> Self {
        Self {
            basis: RecommendationBasis::None,
            books: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// 2段階の推薦。
///
/// 1. queryをauthorに部分一致（大文字小文字無視）。1件でもあればそれを返して終了。
/// 2. なければtitleとの類似度が [`SIMILARITY_CUTOFF`] 以上のものを降順で最大
///    [`MAX_SIMILAR_TITLES`] 件。同率はCatalog順。
pub fn recommend<'a>(catalog: &'a Catalog, query: &str) -> Recommendation<'a> {
    if query.is_empty() {
        return Recommendation::none();
    }

    let lowered = query.to_lowercase();
    let by_author: Vec<&Book> = catalog.iter().filter(|b| b.by_author(&lowered)).collect();
    if !by_author.is_empty() {
        return Recommendation {
            basis: RecommendationBasis::Author,
            books: by_author,
        };
    }

    let mut scored: Vec<(f64, &Book)> = catalog
        .iter()
        .map(|b| (similarity::ratio(query, b.title()), b))
        .filter(|(score, _)| *score >= SIMILARITY_CUTOFF)
        .collect();
    // 安定ソートなので同率はCatalog順のまま
    scored.sort_by(|(x, _), (y, _)| y.partial_cmp(x).unwrap_or(Ordering::Equal));
    scored.truncate(MAX_SIMILAR_TITLES);

    if scored.is_empty() {
        return Recommendation::none();
    }
    Recommendation {
        basis: RecommendationBasis::SimilarTitle,
        books: scored.into_iter().map(|(_, b)| b).collect(),
    }
}
