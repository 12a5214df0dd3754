use crate::domain::model::book::Book;
use crate::domain::model::catalog::Catalog;
use crate::domain::repository::CatalogRepository;

use super::error::AppError;

/// Catalogに対するユースケース。
/// 毎回 load → mutate → save のパターンで操作し、セッション状態は持たない。
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// 保存済みCatalogを読み込む。未保存なら空。
    pub fn load_books(&self) -> Result<Catalog, AppError> {
        self.repo.load().map_err(AppError::from_store)
    }

    /// Catalog全体を保存する（既存内容は置き換え）。
    pub fn save_books(&self, catalog: &Catalog) -> Result<(), AppError> {
        self.repo.save(catalog).map_err(AppError::from_store)
    }

    /// Bookを末尾に追加する。
    pub fn add_book(&self, book: Book) -> Result<(), AppError> {
        let mut catalog = self.load_books()?;
        tracing::info!(title = book.title(), "adding book");
        catalog.add(book);
        self.save_books(&catalog)
    }

    /// titleが一致するBookを削除し、削除件数を返す。
    /// 0件ならファイルには書き込まない。
    pub fn remove_book(&self, title: &str) -> Result<usize, AppError> {
        let mut catalog = self.load_books()?;
        let removed = catalog.remove_by_title(title);
        if removed == 0 {
            tracing::debug!(title, "no book to remove");
            return Ok(0);
        }
        tracing::info!(title, removed, "removing book");
        self.save_books(&catalog)?;
        Ok(removed)
    }

    /// titleが一致する最初のBookを丸ごと置き換える。
    pub fn edit_book(&self, title: &str, book: Book) -> Result<(), AppError> {
        let mut catalog = self.load_books()?;
        tracing::info!(title, new_title = book.title(), "editing book");
        catalog.replace_by_title(title, book)?;
        self.save_books(&catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::infra::json_store::JsonCatalogRepository;

    fn service() -> (tempfile::TempDir, CatalogService<JsonCatalogRepository>) {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonCatalogRepository::new(dir.path().join("books.json"));
        (dir, CatalogService::new(repo))
    }

    #[test]
    fn add_then_load() {
        let (_dir, svc) = service();
        svc.add_book(Book::new("Dune", "Frank Herbert", 1965, 412))
            .unwrap();
        svc.add_book(Book::new("Emma", "Jane Austen", 1815, 474))
            .unwrap();

        assert_eq!(svc.load_books().unwrap().titles(), vec!["Dune", "Emma"]);
    }

    #[test]
    fn remove_missing_does_not_write() {
        let (dir, svc) = service();
        assert_eq!(svc.remove_book("Nope").unwrap(), 0);
        assert!(!dir.path().join("books.json").exists());
    }

    #[test]
    fn edit_missing_leaves_file_untouched() {
        let (_dir, svc) = service();
        svc.add_book(Book::new("Dune", "Frank Herbert", 1965, 412))
            .unwrap();

        let result = svc.edit_book("Nope", Book::new("X", "Y", 1, 1));
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::BookNotFound(_)))
        ));
        assert_eq!(svc.load_books().unwrap().titles(), vec!["Dune"]);
    }
}
