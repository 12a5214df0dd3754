use serde::{Deserialize, Serialize};

use super::book::Book;
use crate::domain::error::DomainError;

/// 蔵書一覧 — 集約ルート。挿入順を保持し、その順で永続化・表示する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }

    /// 選択リスト用のtitle一覧（重複もそのまま返す）。
    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(Book::title).collect()
    }

    /// titleが一致する最初のBook。編集フォームの初期値に使う。
    pub fn find_by_title(&self, title: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.title() == title)
    }

    /// 末尾に追加する。
    pub fn add(&mut self, book: Book) {
        self.books.push(book);
    }

    /// titleが一致するBookをすべて取り除き、削除件数を返す。
    /// 該当なしなら何もしない。
    pub fn remove_by_title(&mut self, title: &str) -> usize {
        let before = self.books.len();
        self.books.retain(|b| b.title() != title);
        before - self.books.len()
    }

    /// titleが一致する最初のBookを4フィールドまとめて上書きする。
    pub fn replace_by_title(&mut self, title: &str, book: Book) -> Result<(), DomainError> {
        let slot = self
            .books
            .iter_mut()
            .find(|b| b.title() == title)
            .ok_or_else(|| DomainError::BookNotFound(title.to_string()))?;
        *slot = book;
        Ok(())
    }
}

impl From<Vec<Book>> for Catalog {
    fn from(books: Vec<Book>) -> Self {
        Self { books }
    }
}

impl FromIterator<Book> for Catalog {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        Self {
            books: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_catalog() -> Catalog {
        Catalog::from(vec![
            Book::new("Foo", "Ann", 2001, 100),
            Book::new("Bar", "Bob", 2002, 200),
        ])
    }

    #[test]
    fn add_appends_at_end() {
        let mut catalog = make_catalog();
        catalog.add(Book::new("Baz", "Cy", 2003, 300));
        assert_eq!(catalog.titles(), vec!["Foo", "Bar", "Baz"]);
    }

    #[test]
    fn remove_exact_title() {
        let mut catalog = make_catalog();
        assert_eq!(catalog.remove_by_title("Foo"), 1);
        assert_eq!(catalog.titles(), vec!["Bar"]);
    }

    #[test]
    fn remove_is_case_sensitive_and_exact() {
        let mut catalog = make_catalog();
        assert_eq!(catalog.remove_by_title("foo"), 0);
        assert_eq!(catalog.remove_by_title("Fo"), 0);
        assert_eq!(catalog, make_catalog());
    }

    #[test]
    fn remove_drops_every_duplicate_title() {
        let mut catalog = make_catalog();
        catalog.add(Book::new("Foo", "Dee", 2010, 50));
        assert_eq!(catalog.remove_by_title("Foo"), 2);
        assert_eq!(catalog.titles(), vec!["Bar"]);
    }

    #[test]
    fn replace_overwrites_first_match_only() {
        let mut catalog = make_catalog();
        catalog.add(Book::new("Foo", "Dee", 2010, 50));

        catalog
            .replace_by_title("Foo", Book::new("Foo II", "Ann", 2005, 150))
            .unwrap();

        assert_eq!(catalog.books()[0], Book::new("Foo II", "Ann", 2005, 150));
        assert_eq!(catalog.books()[2], Book::new("Foo", "Dee", 2010, 50));
    }

    #[test]
    fn replace_unknown_title_errors() {
        let mut catalog = make_catalog();
        let result = catalog.replace_by_title("Nope", Book::new("X", "Y", 1, 1));
        assert!(matches!(result, Err(DomainError::BookNotFound(t)) if t == "Nope"));
        assert_eq!(catalog, make_catalog());
    }

    #[test]
    fn find_by_title_returns_first() {
        let mut catalog = make_catalog();
        catalog.add(Book::new("Foo", "Dee", 2010, 50));
        assert_eq!(catalog.find_by_title("Foo").unwrap().author(), "Ann");
        assert!(catalog.find_by_title("Nope").is_none());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_value(make_catalog()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[1]["title"], "Bar");
    }
}
