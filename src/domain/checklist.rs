use crate::domain::checklist_item::ChecklistItem;
use crate::domain::entry_list::{EntryList, EntryListItem};
use crate::domain::flags::{union_of, Flag, FlagSet, BASE_FLAGS, CHECKLIST_FLAGS};
use crate::domain::ports::{RowSink, RowSource};
use crate::domain::undo::UndoLog;
use crate::utils::error::{ListError, Result};
use serde_json::Value;
use std::collections::BTreeSet;

/// Undo history for checklist item removals.
pub type ChecklistUndo = UndoLog<ChecklistItem>;

/// A named, ordered list of checkable items.
///
/// A checklist is itself an entry of a collection of checklists, so it
/// implements [`EntryListItem`] too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checklist {
    // Empty means the name is not set yet.
    text: String,
    list: EntryList<ChecklistItem>,
}

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            list: EntryList::new(),
        }
    }

    pub fn from_json_value(job: &Value) -> Result<Self> {
        let mut checklist = Self::new();
        checklist.from_json(job)?;
        Ok(checklist)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_json_str_with_defaults(s, &FlagSet::new())
    }

    /// Parses a JSON document; flags it does not mention come from `defaults`.
    pub fn from_json_str_with_defaults(s: &str, defaults: &FlagSet) -> Result<Self> {
        let job: Value = serde_json::from_str(s)?;
        let mut checklist = Self::new();
        checklist.load_json(&job, defaults)?;
        Ok(checklist)
    }

    /// Replaces name, flags and items with those in `job`. Flags absent from
    /// `job` take their value from `defaults`.
    pub fn load_json(&mut self, job: &Value, defaults: &FlagSet) -> Result<()> {
        self.list.clear();
        let job = job
            .as_object()
            .ok_or_else(|| ListError::malformed("checklist record must be an object"))?;
        self.list.base_from_json(&Self::flag_names(), job, defaults)?;

        self.text = job
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ListError::malformed("checklist record has no string 'name'"))?
            .to_string();

        let items = job
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| ListError::malformed("checklist record has no 'items' array"))?;
        for record in items {
            let mut item = ChecklistItem::default();
            item.from_json(record)?;
            self.list.add(item);
        }
        tracing::debug!("Loaded checklist '{}' with {} items", self.text, self.list.len());
        Ok(())
    }

    /// Deep copy: flags and name are copied, every item is cloned under a
    /// fresh uid.
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::with_name(self.text.clone());
        *copy.list.flags_mut() = self.list.flags().clone();
        for item in self.list.iter() {
            copy.list.add(item.duplicate());
        }
        copy
    }

    /// Flags a checklist understands: the entry list flags plus its own.
    pub fn flag_names() -> BTreeSet<Flag> {
        union_of(BASE_FLAGS, CHECKLIST_FLAGS)
    }

    pub fn name(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.text = name.into();
    }

    pub fn flags(&self) -> &FlagSet {
        self.list.flags()
    }

    pub fn get_flag(&self, flag: Flag) -> bool {
        self.list.flags().get(flag)
    }

    pub fn set_flag(&mut self, flag: Flag) {
        self.list.flags_mut().set(flag);
    }

    pub fn clear_flag(&mut self, flag: Flag) {
        self.list.flags_mut().clear(flag);
    }

    /// Manual reordering conflicts with moving checked items to the end.
    pub fn items_are_moveable(&self) -> bool {
        !self.get_flag(Flag::MoveCheckedItemsToEnd)
    }

    pub fn items(&self) -> &[ChecklistItem] {
        self.list.items()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChecklistItem> {
        self.list.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ChecklistItem> {
        self.list.get_mut(index)
    }

    pub fn add(&mut self, item: ChecklistItem) {
        self.list.add(item);
    }

    pub fn put(&mut self, index: usize, item: ChecklistItem) {
        self.list.put(index, item);
    }

    pub fn find(&self, text: &str, match_case: bool) -> Option<usize> {
        self.list.find(text, match_case)
    }

    pub fn index_of(&self, item: &ChecklistItem) -> Option<usize> {
        self.list.index_of(item)
    }

    /// Returns false if items are not moveable or an index is out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        self.items_are_moveable() && self.list.move_item_to_position(from, to)
    }

    pub fn remove_item(&mut self, index: usize, undo: Option<&mut ChecklistUndo>) -> Result<()> {
        self.list.remove(index, undo)
    }

    pub fn undo_remove(&mut self, undo: &mut ChecklistUndo) -> usize {
        self.list.undo_remove(undo)
    }

    pub fn checked_count(&self) -> usize {
        self.list.iter().filter(|item| item.is_done()).count()
    }

    /// Sets every item to `check`. Returns true if any item changed.
    pub fn check_all(&mut self, check: bool) -> bool {
        let mut changed = false;
        for item in self.list.iter_mut().filter(|item| item.is_done() != check) {
            item.set_done(check);
            changed = true;
        }
        changed
    }

    /// Removes every checked item as one undo set and returns how many went.
    /// No set is opened when nothing is checked.
    pub fn delete_all_checked(&mut self, undo: &mut ChecklistUndo) -> usize {
        if self.checked_count() == 0 {
            return 0;
        }
        undo.new_set();
        let removed = self.list.remove_where(ChecklistItem::is_done, undo);
        tracing::debug!("Deleted {} checked items from '{}'", removed, self.text);
        removed
    }

    /// Checks or unchecks one item. With `autodel` set, checking removes the
    /// item in its own undo set instead; the return value says whether it
    /// was removed.
    pub fn set_item_done(&mut self, index: usize, done: bool, undo: &mut ChecklistUndo) -> Result<bool> {
        let len = self.list.len();
        if index >= len {
            return Err(ListError::ItemIndexError { index, len });
        }
        if done && self.get_flag(Flag::AutoDeleteChecked) {
            undo.new_set();
            self.list.remove(index, Some(undo))?;
            return Ok(true);
        }
        if let Some(item) = self.list.get_mut(index) {
            item.set_done(done);
        }
        Ok(false)
    }

    /// Items in display order: alphabetical when `sort` is set, and checked
    /// items after unchecked ones when `movend` is set.
    pub fn display_order(&self) -> Vec<&ChecklistItem> {
        let mut order = self.list.sorted();
        if self.get_flag(Flag::MoveCheckedItemsToEnd) {
            order.sort_by_key(|item| item.is_done());
        }
        order
    }

    pub fn to_csv(&self, sink: &mut dyn RowSink) -> Result<()> {
        for item in self.list.iter() {
            item.to_csv(&self.text, sink)?;
        }
        Ok(())
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let job = self.to_json()?;
        let s = if pretty {
            serde_json::to_string_pretty(&job)?
        } else {
            serde_json::to_string(&job)?
        };
        Ok(s)
    }

    /// Name on the first line, then one line per item in display order.
    pub fn to_plain_text(&self, indent: &str, step: &str) -> String {
        let item_indent = format!("{}{}", indent, step);
        let mut lines = vec![format!("{}{}", indent, self.text)];
        lines.extend(
            self.display_order()
                .into_iter()
                .map(|item| item.to_plain_string(&item_indent)),
        );
        lines.join("\n")
    }
}

impl EntryListItem for Checklist {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn is_moveable(&self) -> bool {
        true
    }

    fn to_json(&self) -> Result<Value> {
        let mut job = self.list.base_to_json(&Self::flag_names());
        job.insert("name".to_string(), Value::String(self.text.clone()));
        job.insert("items".to_string(), Value::Array(self.list.items_to_json()));
        Ok(Value::Object(job))
    }

    fn from_json(&mut self, job: &Value) -> Result<()> {
        self.load_json(job, &FlagSet::new())
    }

    // Rows hold the list name in column 0; the item reads the rest. A run of
    // rows sharing that name belongs to one checklist.
    fn from_csv(&mut self, rows: &mut dyn RowSource) -> Result<bool> {
        let first = match rows.peek()? {
            Some(row) => row.get(0).unwrap_or_default().to_string(),
            None => return Ok(false),
        };
        if self.text.is_empty() {
            self.text = first.clone();
        }
        if self.text != first {
            return Ok(true);
        }

        loop {
            let same_list = match rows.peek()? {
                Some(row) => row.get(0).unwrap_or_default() == self.text,
                None => false,
            };
            if !same_list {
                break;
            }
            let mut item = ChecklistItem::default();
            if !item.from_csv(rows)? {
                break;
            }
            self.list.add(item);
        }
        tracing::debug!("Imported {} rows into '{}'", self.list.len(), self.text);
        Ok(true)
    }

    fn to_plain_string(&self, indent: &str) -> String {
        self.to_plain_text(indent, "\t")
    }
}

/// Reads every checklist in a legacy export, in file order. Each new
/// checklist starts with `defaults` as its flags, since rows carry none.
pub fn read_all_csv(rows: &mut dyn RowSource, defaults: &FlagSet) -> Result<Vec<Checklist>> {
    let mut lists = Vec::new();
    loop {
        let mut checklist = Checklist::new();
        *checklist.list.flags_mut() = defaults.clone();
        if !checklist.from_csv(rows)? || checklist.is_empty() {
            break;
        }
        lists.push(checklist);
    }
    tracing::debug!("Read {} checklists from CSV", lists.len());
    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv_rows::{CsvRowReader, CsvRowWriter};
    use serde_json::json;

    fn groceries() -> Checklist {
        let mut list = Checklist::with_name("Groceries");
        list.add(ChecklistItem::new("milk", false));
        list.add(ChecklistItem::new("eggs", true));
        list.add(ChecklistItem::new("bread", false));
        list.add(ChecklistItem::new("apples", true));
        list
    }

    fn texts(list: &Checklist) -> Vec<&str> {
        list.items().iter().map(|item| item.text()).collect()
    }

    #[test]
    fn test_new_checklist_has_no_name() {
        let list = Checklist::new();
        assert_eq!(list.name(), None);
        assert!(list.is_empty());
        assert_eq!(Checklist::with_name("Todo").name(), Some("Todo"));
    }

    #[test]
    fn test_flag_names_extend_base_flags() {
        let names = Checklist::flag_names();
        assert!(names.contains(&Flag::Sort));
        assert!(names.contains(&Flag::MoveCheckedItemsToEnd));
        assert!(names.contains(&Flag::AutoDeleteChecked));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_items_are_moveable_tracks_movend() {
        let mut list = Checklist::new();
        assert!(list.is_moveable());
        assert!(list.items_are_moveable());
        list.set_flag(Flag::MoveCheckedItemsToEnd);
        assert!(!list.items_are_moveable());
        list.add(ChecklistItem::new("x", false));
        assert!(!list.items_are_moveable());
        assert!(!list.move_item(0, 0));
        list.clear_flag(Flag::MoveCheckedItemsToEnd);
        assert!(list.items_are_moveable());
    }

    #[test]
    fn test_json_round_trip() {
        let mut list = groceries();
        list.set_flag(Flag::AutoDeleteChecked);
        let job = list.to_json().unwrap();
        assert_eq!(job["name"], json!("Groceries"));
        assert_eq!(job["autodel"], json!(true));
        assert_eq!(job["items"].as_array().unwrap().len(), 4);

        let back = Checklist::from_json_value(&job).unwrap();
        assert_eq!(back, list);
        assert_eq!(back.items()[3].uid(), list.items()[3].uid());
    }

    #[test]
    fn test_missing_sort_key_uses_default_flags() {
        let mut defaults = FlagSet::new();
        defaults.set(Flag::Sort);
        let text = r#"{"name": "Old", "items": [{"name": "b"}, {"name": "a"}]}"#;

        let list = Checklist::from_json_str_with_defaults(text, &defaults).unwrap();
        assert!(list.get_flag(Flag::Sort));
        assert_eq!(list.display_order()[0].text(), "a");

        let explicit = r#"{"name": "Old", "sort": false, "items": []}"#;
        let list = Checklist::from_json_str_with_defaults(explicit, &defaults).unwrap();
        assert!(!list.get_flag(Flag::Sort));
        assert!(!Checklist::from_json_str(text).unwrap().get_flag(Flag::Sort));
    }

    #[test]
    fn test_from_json_replaces_existing_items() {
        let mut list = groceries();
        list.from_json(&json!({"name": "Hardware", "items": [{"name": "nails"}]}))
            .unwrap();
        assert_eq!(list.name(), Some("Hardware"));
        assert_eq!(texts(&list), vec!["nails"]);
    }

    #[test]
    fn test_from_json_missing_fields_is_malformed() {
        let err = Checklist::from_json_value(&json!({"name": "x"})).unwrap_err();
        assert!(err.is_malformed_input());
        let err = Checklist::from_json_value(&json!({"items": []})).unwrap_err();
        assert!(err.is_malformed_input());
        let err = Checklist::from_json_value(&json!({"name": "x", "items": {}})).unwrap_err();
        assert!(err.is_malformed_input());
        let err = Checklist::from_json_value(&json!([])).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_duplicate_is_independent() {
        let original = groceries();
        let mut copy = original.duplicate();
        assert_eq!(copy, original);
        assert_ne!(copy.items()[0].uid(), original.items()[0].uid());

        copy.get_mut(0).unwrap().set_done(true);
        copy.get_mut(1).unwrap().set_text("duck eggs".to_string());
        assert!(!original.items()[0].is_done());
        assert_eq!(original.items()[1].text(), "eggs");
    }

    #[test]
    fn test_check_all() {
        let mut list = groceries();
        assert!(list.check_all(true));
        assert_eq!(list.checked_count(), list.len());
        assert!(!list.check_all(true));

        assert!(list.check_all(false));
        assert_eq!(list.checked_count(), 0);
        assert!(!list.check_all(false));
        assert!(!Checklist::new().check_all(true));
    }

    #[test]
    fn test_delete_all_checked() {
        let mut list = groceries();
        let mut undo = ChecklistUndo::new();
        assert_eq!(list.delete_all_checked(&mut undo), 2);
        assert_eq!(texts(&list), vec!["milk", "bread"]);
        assert_eq!(undo.depth(), 1);

        assert_eq!(list.undo_remove(&mut undo), 2);
        assert_eq!(texts(&list), vec!["milk", "eggs", "bread", "apples"]);
    }

    #[test]
    fn test_delete_all_checked_with_nothing_checked_opens_no_set() {
        let mut list = groceries();
        list.check_all(false);
        let mut undo = ChecklistUndo::new();
        assert_eq!(list.delete_all_checked(&mut undo), 0);
        assert!(undo.is_empty());
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_set_item_done_with_autodel() {
        let mut list = groceries();
        let mut undo = ChecklistUndo::new();
        assert!(!list.set_item_done(0, true, &mut undo).unwrap());
        assert!(list.items()[0].is_done());

        list.set_flag(Flag::AutoDeleteChecked);
        assert!(list.set_item_done(2, true, &mut undo).unwrap());
        assert_eq!(texts(&list), vec!["milk", "eggs", "apples"]);
        assert!(!list.set_item_done(1, false, &mut undo).unwrap());
        assert_eq!(list.len(), 3);

        let err = list.set_item_done(9, true, &mut undo).unwrap_err();
        assert!(matches!(err, ListError::ItemIndexError { index: 9, len: 3 }));
    }

    #[test]
    fn test_display_order() {
        let mut list = groceries();
        let order = |l: &Checklist| -> Vec<String> {
            l.display_order().iter().map(|i| i.text().to_string()).collect()
        };
        assert_eq!(order(&list), vec!["milk", "eggs", "bread", "apples"]);

        list.set_flag(Flag::MoveCheckedItemsToEnd);
        assert_eq!(order(&list), vec!["milk", "bread", "eggs", "apples"]);

        list.set_flag(Flag::Sort);
        assert_eq!(order(&list), vec!["bread", "milk", "apples", "eggs"]);
        assert_eq!(texts(&list), vec!["milk", "eggs", "bread", "apples"]);
    }

    #[test]
    fn test_from_csv_stops_at_next_list() {
        let data = "Groceries,milk,FALSE\nGroceries,eggs,TRUE\nGroceries,bread,\nHardware,nails,FALSE\n";
        let mut rows = CsvRowReader::new(data.as_bytes());
        let mut list = Checklist::new();
        assert!(list.from_csv(&mut rows).unwrap());
        assert_eq!(list.name(), Some("Groceries"));
        assert_eq!(texts(&list), vec!["milk", "eggs", "bread"]);
        assert_eq!(rows.rows_consumed(), 3);
        assert_eq!(rows.peek().unwrap().unwrap().get(0), Some("Hardware"));
    }

    #[test]
    fn test_from_csv_empty_input_consumes_nothing() {
        let mut rows = CsvRowReader::new("".as_bytes());
        let mut list = Checklist::new();
        assert!(!list.from_csv(&mut rows).unwrap());
        assert_eq!(list.name(), None);
    }

    #[test]
    fn test_from_csv_named_list_ignores_foreign_rows() {
        let mut rows = CsvRowReader::new("Hardware,nails,\n".as_bytes());
        let mut list = Checklist::with_name("Groceries");
        assert!(list.from_csv(&mut rows).unwrap());
        assert!(list.is_empty());
        assert_eq!(rows.rows_consumed(), 0);
    }

    #[test]
    fn test_read_all_csv_applies_defaults() {
        let data = "A,one,\nA,two,1\nB,three,\n";
        let mut rows = CsvRowReader::new(data.as_bytes());
        let mut defaults = FlagSet::new();
        defaults.set(Flag::Sort);
        let lists = read_all_csv(&mut rows, &defaults).unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].name(), Some("A"));
        assert_eq!(lists[0].checked_count(), 1);
        assert_eq!(lists[1].name(), Some("B"));
        assert!(lists[1].get_flag(Flag::Sort));
    }

    #[test]
    fn test_to_csv_writes_name_column() {
        let list = groceries();
        let mut sink = CsvRowWriter::new(Vec::new());
        list.to_csv(&mut sink).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "Groceries,milk,FALSE\nGroceries,eggs,TRUE\nGroceries,bread,FALSE\nGroceries,apples,TRUE\n"
        );
    }

    #[test]
    fn test_plain_text() {
        let mut list = Checklist::with_name("Chores");
        list.add(ChecklistItem::new("dishes", true));
        list.add(ChecklistItem::new("laundry", false));
        assert_eq!(list.to_plain_text("", "  "), "Chores\n  dishes *\n  laundry");
        assert_eq!(list.to_plain_string(""), "Chores\n\tdishes *\n\tlaundry");
    }
}
