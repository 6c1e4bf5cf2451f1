//! In-memory projections of backend collections.
//!
//! Nothing here is authoritative: every container is rebuilt from the backend after
//! a mutation.

use alasr_types::{Identified, Masjid, Question, User};

/// One collection plus its UI flags.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub selected: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }
}

impl<T: Identified + Clone> ListState<T> {
    /// Replace the collection; clears the loading flag and any error.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    pub fn set_selected(&mut self, selected: Option<T>) {
        self.selected = selected;
    }

    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replace the item with the same id. No-op when absent.
    pub fn update(&mut self, item: T) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id() == item.id()) {
            *existing = item;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.id() != id);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.loading = false;
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|i| i.id() == id)
    }
}

/// Everything the console keeps between operations of one invocation.
#[derive(Debug, Clone, Default)]
pub struct PortalState {
    pub users: ListState<User>,
    pub masajids: ListState<Masjid>,
    pub questions: ListState<Question>,
    pub session: Option<User>,
}
