use crate::domain::flags::{Flag, FlagSet};
use crate::domain::ports::RowSource;
use crate::domain::undo::UndoLog;
use crate::utils::error::{ListError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Anything that can live in an [`EntryList`].
pub trait EntryListItem {
    fn text(&self) -> &str;

    fn set_text(&mut self, text: String);

    /// Whether the user may drag this entry to a new position.
    fn is_moveable(&self) -> bool;

    fn to_json(&self) -> Result<Value>;

    fn from_json(&mut self, job: &Value) -> Result<()>;

    /// Loads from the row source. `Ok(false)` means nothing was consumed.
    fn from_csv(&mut self, rows: &mut dyn RowSource) -> Result<bool>;

    fn to_plain_string(&self, indent: &str) -> String;
}

/// Ordered entries plus the flags shared by every kind of list.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryList<T> {
    items: Vec<T>,
    flags: FlagSet,
}

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            flags: FlagSet::default(),
        }
    }
}

impl<T> EntryList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }

    /// Appends to the end of the list.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Inserts at `index`, or at the end when `index` is past it.
    pub fn put(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Removes the entry at `index`. With an undo log the removal is recorded
    /// in its newest set so it can be restored later.
    pub fn remove(&mut self, index: usize, undo: Option<&mut UndoLog<T>>) -> Result<()> {
        if index >= self.items.len() {
            return Err(ListError::ItemIndexError {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        if let Some(log) = undo {
            log.record(index, item);
        }
        tracing::debug!("Removed entry at {}", index);
        Ok(())
    }

    /// Removes every entry matching `pred`, in list order, recording each
    /// removal in `undo`. Returns how many were removed.
    pub fn remove_where<F>(&mut self, pred: F, undo: &mut UndoLog<T>) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let kill: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| pred(*item))
            .map(|(i, _)| i)
            .collect();
        for (removed, index) in kill.iter().enumerate() {
            let at = index - removed;
            let item = self.items.remove(at);
            undo.record(at, item);
        }
        kill.len()
    }

    /// Restores the newest undo set. Returns the number of entries restored.
    pub fn undo_remove(&mut self, undo: &mut UndoLog<T>) -> usize {
        let Some(set) = undo.pop_set() else {
            return 0;
        };
        let restored = set.len();
        for removal in set.into_removals().into_iter().rev() {
            self.put(removal.index, removal.item);
        }
        tracing::debug!("Restored {} entries", restored);
        restored
    }

    /// Moves the entry at `from` so that it ends up at `to`.
    pub fn move_item_to_position(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    pub fn base_to_json(&self, recognized: &BTreeSet<Flag>) -> Map<String, Value> {
        let mut job = Map::new();
        self.flags.write_json(recognized, &mut job);
        job
    }

    pub fn base_from_json(
        &mut self,
        recognized: &BTreeSet<Flag>,
        job: &Map<String, Value>,
        defaults: &FlagSet,
    ) -> Result<()> {
        self.flags.read_json(recognized, job, defaults)
    }
}

impl<T: PartialEq> EntryList<T> {
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|it| it == item)
    }
}

impl<T: EntryListItem> EntryList<T> {
    /// Finds an entry by text. An exact case-insensitive match wins; unless
    /// `match_case` is set, a case-insensitive substring match is tried next.
    pub fn find(&self, text: &str, match_case: bool) -> Option<usize> {
        let exact = self
            .items
            .iter()
            .position(|it| it.text().to_lowercase() == text.to_lowercase());
        if exact.is_some() || match_case {
            return exact;
        }
        let needle = text.to_lowercase();
        self.items
            .iter()
            .position(|it| it.text().to_lowercase().contains(&needle))
    }

    /// Entries in insertion order, or alphabetically when `sort` is set.
    pub fn sorted(&self) -> Vec<&T> {
        let mut refs: Vec<&T> = self.items.iter().collect();
        if self.flags.get(Flag::Sort) {
            refs.sort_by_key(|it| it.text().to_lowercase());
        }
        refs
    }

    /// Serializes every entry in list order. An entry that fails is logged
    /// and left out.
    pub fn items_to_json(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            match item.to_json() {
                Ok(value) => out.push(value),
                Err(e) => tracing::error!("Failed to serialize entry {}: {}", index, e),
            }
        }
        out
    }
}
