//! Synchronous change notifications from the bookshelf to its views.
//!
//! Listeners are called in subscription order on the caller's thread,
//! before the triggering operation returns.

use crate::domain::model::book::Book;

/// 本棚から通知されるイベント。ペイロードは持たない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShelfEvent {
    /// コレクションが変わった。全体を再描画する。
    Changed,
    /// コレクションを永続化した。
    Persisted,
}

/// 通知の受け手。`books` は通知時点の読み取り専用スナップショット。
pub trait ShelfListener: Send {
    fn on_event(&mut self, event: ShelfEvent, books: &[Book]);
}

impl<F> ShelfListener for F
where
    F: FnMut(ShelfEvent, &[Book]) + Send,
{
    fn on_event(&mut self, event: ShelfEvent, books: &[Book]) {
        self(event, books)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// 購読者リスト。
#[derive(Default)]
pub struct Notifier {
    listeners: Vec<(SubscriptionId, Box<dyn ShelfListener>)>,
    next_id: u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl ShelfListener + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// 購読解除。登録されていたら `true`。
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, event: ShelfEvent, books: &[Book]) {
        for (_, listener) in &mut self.listeners {
            listener.on_event(event, books);
        }
    }
}
