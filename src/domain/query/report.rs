use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::model::book::Book;
use crate::domain::model::catalog::Catalog;

/// 集計レポート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub average_pages: f64,
    pub most_pages: Book,
    /// 最も古い（yearが最小の）Book
    pub earliest: Book,
    /// 最も新しい（yearが最大の）Book
    pub latest: Book,
}

/// Catalog全体を集計する。空のCatalogはエラー。
///
/// 最大・最小が同値のときはCatalog順で先に現れたBookを選ぶ。
pub fn report(catalog: &Catalog) -> Result<Summary, DomainError> {
    let mut books = catalog.iter();
    let first = books.next().ok_or(DomainError::EmptyCatalog)?;

    // i64を超える合計でも溢れないようi128で集計する
    let mut total_pages = i128::from(first.pages());
    let mut most_pages = first;
    let mut earliest = first;
    let mut latest = first;

    for book in books {
        total_pages += i128::from(book.pages());
        if book.pages() > most_pages.pages() {
            most_pages = book;
        }
        if book.year() < earliest.year() {
            earliest = book;
        }
        if book.year() > latest.year() {
            latest = book;
        }
    }

    Ok(Summary {
        total_count: catalog.len(),
        average_pages: total_pages as f64 / catalog.len() as f64,
        most_pages: most_pages.clone(),
        earliest: earliest.clone(),
        latest: latest.clone(),
    })
}
