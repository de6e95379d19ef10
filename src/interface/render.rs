//! Plain-text projection of the bookshelf for tool output.

use crate::application::shelf::Shelves;
use crate::domain::model::book::Book;

/// 1冊を1行で表示する。
pub fn format_book(book: &Book) -> String {
    let mark = if book.is_complete() { "x" } else { " " };
    let author = if book.author().is_empty() {
        "unknown author"
    } else {
        book.author()
    };
    format!(
        "- [{mark}] {}. {} by {} ({})",
        book.id(),
        book.title(),
        author,
        book.year()
    )
}

/// 未読・読了の2段で本棚全体を表示する。
pub fn format_shelves(shelves: &Shelves<'_>) -> String {
    let mut out = String::new();
    push_section(&mut out, "Unfinished", &shelves.unfinished);
    out.push('\n');
    push_section(&mut out, "Finished", &shelves.finished);
    out
}

/// 検索結果の一覧。
pub fn format_matches(keyword: &str, books: &[&Book]) -> String {
    if books.is_empty() {
        return format!("No books matching '{keyword}'.");
    }
    let mut out = format!("{} book(s) matching '{keyword}':\n", books.len());
    for book in books {
        out.push_str(&format_book(book));
        out.push('\n');
    }
    out
}

fn push_section(out: &mut String, heading: &str, books: &[&Book]) {
    out.push_str(&format!("## {heading} ({})\n", books.len()));
    if books.is_empty() {
        out.push_str("(empty)\n");
    }
    for book in books {
        out.push_str(&format_book(book));
        out.push('\n');
    }
}
