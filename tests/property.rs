//! Property-based tests: invariant verification with proptest.

mod common;

use std::collections::HashSet;

use common::{events, memory_shelf, record_events};
use proptest::prelude::*;

use bookshelf_mcp::application::storage::{StorageAdapter, STORAGE_KEY};
use bookshelf_mcp::domain::model::book::{Book, BookDraft};
use bookshelf_mcp::domain::model::coerce::parse_year;
use bookshelf_mcp::domain::model::id::BookId;
use bookshelf_mcp::infra::memory_store::MemoryStore;

fn draft_strategy() -> impl Strategy<Value = BookDraft> {
    (
        "[A-Za-z0-9 ]{1,20}",
        "[A-Za-z .]{0,20}",
        any::<i32>(),
        any::<bool>(),
    )
        .prop_map(|(title, author, year, done)| BookDraft::new(title, author, year, done))
}

// =============================================================================
// Id and storage invariants
// =============================================================================

proptest! {
    /// 1クロック以上離れたaddのIDは互いに異なる。
    #[test]
    fn ids_are_unique(drafts in prop::collection::vec(draft_strategy(), 1..20)) {
        let mut shelf = memory_shelf();
        let ids: Vec<BookId> = drafts.into_iter().map(|d| shelf.add(d)).collect();
        let unique: HashSet<BookId> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    /// load(save(collection)) == collection
    #[test]
    fn save_load_roundtrip(drafts in prop::collection::vec(draft_strategy(), 0..15)) {
        let books: Vec<Book> = drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| Book::new(BookId::new(1_700_000_000_000 + i as i64), d))
            .collect();
        let adapter = StorageAdapter::new(MemoryStore::new());

        adapter.save(&books).unwrap();
        prop_assert_eq!(adapter.load().unwrap(), Some(books));
    }

    /// 文字列で保存された年は数値として読み戻される。
    #[test]
    fn year_text_coerces_to_number(year in any::<i32>()) {
        prop_assert_eq!(parse_year(&year.to_string()), year);

        let raw = format!(r#"[{{"id":1,"title":"T","author":"A","year":"{year}"}}]"#);
        let adapter = StorageAdapter::new(MemoryStore::with_entry(STORAGE_KEY, raw));
        let books = adapter.load().unwrap().unwrap();
        prop_assert_eq!(books[0].year(), year);
        prop_assert!(!books[0].is_complete());
    }
}

// =============================================================================
// Bookshelf invariants
// =============================================================================

proptest! {
    /// toggle_completionを2回適用すると元に戻る。
    #[test]
    fn toggle_twice_restores(draft in draft_strategy()) {
        let original = draft.is_complete;
        let mut shelf = memory_shelf();
        let id = shelf.add(draft);

        shelf.toggle_completion(id).unwrap();
        prop_assert_eq!(shelf.find(id).unwrap().is_complete(), !original);
        shelf.toggle_completion(id).unwrap();
        prop_assert_eq!(shelf.find(id).unwrap().is_complete(), original);
    }

    /// 存在しないIDへの操作は保存内容も通知も変えない。
    #[test]
    fn missing_id_is_noop(
        drafts in prop::collection::vec(draft_strategy(), 0..10),
        missing in 1_000i64..2_000,
    ) {
        let mut shelf = memory_shelf();
        for d in drafts {
            shelf.add(d);
        }
        let before = shelf.storage().store().raw(STORAGE_KEY);
        let snapshot = shelf.books().to_vec();
        let log = record_events(&mut shelf);
        let id = BookId::new(missing);

        prop_assert!(shelf.update(id, BookDraft::new("x", "y", 0, true)).is_err());
        prop_assert!(shelf.delete(id).is_err());
        prop_assert!(shelf.toggle_completion(id).is_err());

        prop_assert_eq!(shelf.storage().store().raw(STORAGE_KEY), before);
        prop_assert_eq!(shelf.books(), snapshot.as_slice());
        prop_assert!(events(&log).is_empty());
    }

    /// 検索結果はすべてキーワードを含み、コレクションは変わらない。
    #[test]
    fn search_is_a_pure_filter(
        drafts in prop::collection::vec(draft_strategy(), 0..10),
        keyword in "[A-Za-z]{0,3}",
    ) {
        let mut shelf = memory_shelf();
        for d in drafts {
            shelf.add(d);
        }
        let before = shelf.len();
        let needle = keyword.to_lowercase();

        let hits = shelf.search(&keyword);
        for book in &hits {
            prop_assert!(book.title().to_lowercase().contains(&needle));
        }
        let expected = shelf
            .books()
            .iter()
            .filter(|b| b.title().to_lowercase().contains(&needle))
            .count();
        prop_assert_eq!(hits.len(), expected);
        prop_assert_eq!(shelf.len(), before);
    }

    /// delete後も残りの順序は保たれる。
    #[test]
    fn delete_preserves_order(n in 2usize..10, pick in 0usize..10) {
        let mut shelf = memory_shelf();
        let ids: Vec<BookId> = (0..n)
            .map(|i| shelf.add(BookDraft::new(format!("Book {i}"), "", 2000, false)))
            .collect();
        let victim = ids[pick % n];

        shelf.delete(victim).unwrap();

        let remaining: Vec<BookId> = shelf.books().iter().map(|b| b.id()).collect();
        let expected: Vec<BookId> = ids.into_iter().filter(|id| *id != victim).collect();
        prop_assert_eq!(remaining, expected);
    }
}
