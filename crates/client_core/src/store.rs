//! Observable widget state.

use shared::domain::{Recommendation, UserSet};
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetState {
    /// Current contents of the tag input, also the selected user.
    pub tag: String,
    pub users: UserSet,
    pub recommendations: Vec<Recommendation>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Holds the latest [`WidgetState`] and wakes every subscriber when it changes.
pub struct StateStore {
    tx: watch::Sender<WidgetState>,
}

impl StateStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(WidgetState::default());
        Self { tx }
    }

    pub fn snapshot(&self) -> WidgetState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.tx.subscribe()
    }

    pub fn update(&self, mutate: impl FnOnce(&mut WidgetState)) {
        self.tx.send_modify(mutate);
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&WidgetState) -> T) -> T {
        f(&self.tx.borrow())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
