//! Explicit record of tracked removals, grouped into undo sets.
//!
//! Lists never own an undo history; callers pass an [`UndoLog`] into every
//! operation that removes items and decide where it lives.

#[derive(Debug, Clone, PartialEq)]
pub struct Removal<T> {
    pub index: usize,
    pub item: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoSet<T> {
    removals: Vec<Removal<T>>,
}

impl<T> Default for UndoSet<T> {
    fn default() -> Self {
        Self {
            removals: Vec::new(),
        }
    }
}

impl<T> UndoSet<T> {
    pub fn len(&self) -> usize {
        self.removals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    pub fn removals(&self) -> &[Removal<T>] {
        &self.removals
    }

    pub fn into_removals(self) -> Vec<Removal<T>> {
        self.removals
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoLog<T> {
    sets: Vec<UndoSet<T>>,
}

impl<T> Default for UndoLog<T> {
    fn default() -> Self {
        Self { sets: Vec::new() }
    }
}

impl<T> UndoLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new set; later removals belong to it until the next call.
    pub fn new_set(&mut self) {
        self.sets.push(UndoSet::default());
    }

    /// Records a removal in the newest set, opening one if none exists.
    pub fn record(&mut self, index: usize, item: T) {
        if self.sets.is_empty() {
            self.new_set();
        }
        if let Some(set) = self.sets.last_mut() {
            set.removals.push(Removal { index, item });
        }
    }

    pub fn pop_set(&mut self) -> Option<UndoSet<T>> {
        self.sets.pop()
    }

    pub fn latest(&self) -> Option<&UndoSet<T>> {
        self.sets.last()
    }

    /// Number of open sets, empty ones included.
    pub fn depth(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
