//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use catalog_mcp::application::service::CatalogService;
use catalog_mcp::domain::model::book::Book;
use catalog_mcp::domain::model::catalog::Catalog;
use catalog_mcp::domain::repository::{CatalogRepository, StoreError, StoreErrorKind};

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error ({0:?})")]
pub struct InMemoryError(pub StoreErrorKind);

impl StoreError for InMemoryError {
    fn kind(&self) -> StoreErrorKind {
        self.0
    }
}

/// ファイルI/O不要のインメモリリポジトリ。JSON文字列で保持する。
pub struct InMemoryRepo {
    store: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    saves: Cell<usize>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(None),
            fail_writes: Cell::new(false),
            saves: Cell::new(0),
        }
    }

    /// 壊れた保存内容を仕込む。
    pub fn with_raw(raw: &str) -> Self {
        let repo = Self::new();
        *repo.store.borrow_mut() = Some(raw.to_string());
        repo
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn raw(&self) -> Option<String> {
        self.store.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl CatalogRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        match self.store.borrow().as_deref() {
            Some(json) => serde_json::from_str(json)
                .map_err(|_| InMemoryError(StoreErrorKind::CorruptData)),
            None => Ok(Catalog::new()),
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(InMemoryError(StoreErrorKind::Io));
        }
        let json = serde_json::to_string(catalog).unwrap();
        *self.store.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// =============================================================================
// TestCatalog — テスト用Catalog作成ヘルパー
// =============================================================================

pub struct TestCatalog;

impl TestCatalog {
    /// 標準的なテスト用Catalog:
    /// ```text
    /// Dune             Frank Herbert     1965  412
    /// The Hobbit       J. R. R. Tolkien  1937  310
    /// Anathem          Neal Stephenson   2008  937
    /// Dune Messiah     Frank Herbert     1969  256
    /// ```
    pub fn standard() -> Catalog {
        Catalog::from(vec![
            Book::new("Dune", "Frank Herbert", 1965, 412),
            Book::new("The Hobbit", "J. R. R. Tolkien", 1937, 310),
            Book::new("Anathem", "Neal Stephenson", 2008, 937),
            Book::new("Dune Messiah", "Frank Herbert", 1969, 256),
        ])
    }

    /// InMemoryRepoにCatalogを保存してCatalogServiceを返す。
    pub fn service_with(catalog: &Catalog) -> CatalogService<InMemoryRepo> {
        let repo = InMemoryRepo::new();
        repo.save(catalog).unwrap();
        CatalogService::new(repo)
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}

pub fn titles(books: &[&Book]) -> Vec<String> {
    books.iter().map(|b| b.title().to_string()).collect()
}
