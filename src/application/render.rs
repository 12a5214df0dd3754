use crate::domain::model::book::Book;
use crate::domain::query::{Recommendation, RecommendationBasis, Summary};

/// Book一覧をMarkdownの表に変換する。
pub fn render_table(books: &[&Book]) -> String {
    let mut buf = String::from("| Title | Author | Year | Pages |\n|---|---|---|---|\n");
    for book in books {
        buf.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(book.title()),
            escape_cell(book.author()),
            book.year(),
            book.pages()
        ));
    }
    buf
}

/// 集計レポートを箇条書きにする。平均は小数2桁。
pub fn render_summary(summary: &Summary) -> String {
    format!(
        "# Summary Report\n\n\
         - Total books: {}\n\
         - Average pages: {:.2}\n\
         - Most pages: {} ({} pages)\n\
         - Oldest book: {} ({})\n\
         - Newest book: {} ({})\n",
        summary.total_count,
        summary.average_pages,
        summary.most_pages.title(),
        summary.most_pages.pages(),
        summary.earliest.title(),
        summary.earliest.year(),
        summary.latest.title(),
        summary.latest.year(),
    )
}

/// 推薦結果を根拠の見出し付きで表にする。
pub fn render_recommendation(rec: &Recommendation<'_>) -> String {
    let heading = match rec.basis {
        RecommendationBasis::Author => "Based on Author",
        RecommendationBasis::SimilarTitle => "Based on Similar Titles",
        RecommendationBasis::None => return "No recommendations found.".to_string(),
    };
    format!("## {heading}\n\n{}", render_table(&rec.books))
}

/// セル内の `|` と改行が表を崩さないようにする。
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::catalog::Catalog;
    use crate::domain::query::{recommend, report};

    #[test]
    fn table_header_only_when_empty() {
        assert_eq!(
            render_table(&[]),
            "| Title | Author | Year | Pages |\n|---|---|---|---|\n"
        );
    }

    #[test]
    fn table_escapes_pipes() {
        let book = Book::new("A|B", "C\nD", 1, 2);
        let table = render_table(&[&book]);
        assert!(table.contains("| A\\|B | C D | 1 | 2 |"));
    }

    #[test]
    fn summary_average_two_decimals() {
        let catalog = Catalog::from(vec![Book::new("A", "a", 1, 1), Book::new("B", "b", 2, 2)]);
        let text = render_summary(&report(&catalog).unwrap());
        assert!(text.contains("- Average pages: 1.50\n"));
    }

    #[test]
    fn recommendation_none_message() {
        let catalog = Catalog::new();
        let text = render_recommendation(&recommend(&catalog, "dune"));
        assert_eq!(text, "No recommendations found.");
    }

    #[test]
    fn recommendation_heading_by_basis() {
        let catalog = Catalog::from(vec![Book::new("Dune", "Frank Herbert", 1965, 412)]);
        assert!(render_recommendation(&recommend(&catalog, "frank")).starts_with("## Based on Author"));
        assert!(
            render_recommendation(&recommend(&catalog, "Dune Messiah"))
                .starts_with("## Based on Similar Titles")
        );
    }
}
