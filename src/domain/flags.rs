use crate::utils::error::{ListError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// A named boolean attribute of a list, persisted under its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    /// Display the list alphabetically.
    Sort,
    /// Display checked items after the unchecked ones.
    MoveCheckedItemsToEnd,
    /// Remove an item as soon as it is checked.
    AutoDeleteChecked,
}

/// Flags every entry list understands.
pub const BASE_FLAGS: &[Flag] = &[Flag::Sort];

/// Flags a checklist adds to [`BASE_FLAGS`].
pub const CHECKLIST_FLAGS: &[Flag] = &[Flag::MoveCheckedItemsToEnd, Flag::AutoDeleteChecked];

impl Flag {
    pub fn name(self) -> &'static str {
        match self {
            Flag::Sort => "sort",
            Flag::MoveCheckedItemsToEnd => "movend",
            Flag::AutoDeleteChecked => "autodel",
        }
    }

    pub fn from_name(name: &str) -> Option<Flag> {
        match name {
            "sort" => Some(Flag::Sort),
            "movend" => Some(Flag::MoveCheckedItemsToEnd),
            "autodel" => Some(Flag::AutoDeleteChecked),
            _ => None,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Union of a base flag set and a subtype delta.
pub fn union_of(base: &[Flag], delta: &[Flag]) -> BTreeSet<Flag> {
    base.iter().chain(delta.iter()).copied().collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    set: BTreeSet<Flag>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, flag: Flag) -> bool {
        self.set.contains(&flag)
    }

    pub fn set(&mut self, flag: Flag) {
        self.set.insert(flag);
    }

    pub fn clear(&mut self, flag: Flag) {
        self.set.remove(&flag);
    }

    pub fn put(&mut self, flag: Flag, value: bool) {
        if value {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    pub fn clear_all(&mut self) {
        self.set.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.set.iter().copied()
    }

    /// Writes every flag out of `recognized` as `"<name>": <bool>`.
    pub fn write_json(&self, recognized: &BTreeSet<Flag>, job: &mut Map<String, Value>) {
        for flag in recognized {
            job.insert(flag.name().to_string(), Value::Bool(self.get(*flag)));
        }
    }

    /// Replaces the contents with the recognized flags found in `job`. A flag
    /// missing from `job` takes its value from `defaults`.
    pub fn read_json(
        &mut self,
        recognized: &BTreeSet<Flag>,
        job: &Map<String, Value>,
        defaults: &FlagSet,
    ) -> Result<()> {
        self.clear_all();
        for flag in recognized {
            match job.get(flag.name()) {
                None | Some(Value::Null) => self.put(*flag, defaults.get(*flag)),
                Some(Value::Bool(value)) => self.put(*flag, *value),
                Some(other) => {
                    return Err(ListError::malformed(format!(
                        "flag '{}' must be a boolean, found {}",
                        flag, other
                    )))
                }
            }
        }
        Ok(())
    }
}
