use crate::domain::entry_list::EntryListItem;
use crate::domain::ports::{RowSink, RowSource};
use crate::utils::error::{ListError, Result};
use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

static LAST_UID: AtomicU64 = AtomicU64::new(0);

// "", "0" and any spelling of "false" read as not done.
static NOT_DONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:false|0|)$").expect("static regex"));

/// Returns a process-unique id seeded from the wall clock in milliseconds.
pub fn next_uid() -> u64 {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let mut last = LAST_UID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_UID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(seen) => last = seen,
        }
    }
}

/// A checkable entry of a checklist.
#[derive(Debug, Clone)]
pub struct ChecklistItem {
    uid: u64,
    text: String,
    done: bool,
}

impl Default for ChecklistItem {
    fn default() -> Self {
        Self::new("", false)
    }
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>, done: bool) -> Self {
        Self {
            uid: next_uid(),
            text: text.into(),
            done,
        }
    }

    /// Copies text and done state under a fresh uid.
    pub fn duplicate(&self) -> Self {
        Self::new(self.text.clone(), self.done)
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Adopts the text and done state of `other`. Returns true if either changed.
    pub fn merge(&mut self, other: &ChecklistItem) -> bool {
        let mut changed = false;
        if self.text != other.text {
            self.text = other.text.clone();
            changed = true;
        }
        if self.done != other.done {
            self.done = other.done;
            changed = true;
        }
        changed
    }

    pub fn to_csv(&self, list_name: &str, sink: &mut dyn RowSink) -> Result<()> {
        let done = if self.done { "TRUE" } else { "FALSE" };
        sink.write_row(&[list_name, &self.text, done])
    }
}

impl PartialEq for ChecklistItem {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.done == other.done
    }
}

impl EntryListItem for ChecklistItem {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn is_moveable(&self) -> bool {
        !self.done
    }

    fn to_json(&self) -> Result<Value> {
        let mut iob = Map::new();
        iob.insert("uid".to_string(), Value::from(self.uid));
        iob.insert("name".to_string(), Value::String(self.text.clone()));
        if self.done {
            iob.insert("done".to_string(), Value::Bool(true));
        }
        Ok(Value::Object(iob))
    }

    fn from_json(&mut self, job: &Value) -> Result<()> {
        let job = job
            .as_object()
            .ok_or_else(|| ListError::malformed("item record must be an object"))?;

        self.text = job
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ListError::malformed("item record has no string 'name'"))?
            .to_string();

        self.uid = match job.get("uid") {
            None | Some(Value::Null) => next_uid(),
            Some(v) => {
                let uid = v.as_u64().ok_or_else(|| {
                    ListError::malformed(format!("item 'uid' is not an unsigned integer: {}", v))
                })?;
                // Fresh uids must stay above every uid already loaded.
                LAST_UID.fetch_max(uid, Ordering::Relaxed);
                uid
            }
        };

        self.done = match job.get("done") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(done)) => *done,
            Some(v) => {
                return Err(ListError::malformed(format!(
                    "item 'done' is not a boolean: {}",
                    v
                )))
            }
        };
        Ok(())
    }

    fn from_csv(&mut self, rows: &mut dyn RowSource) -> Result<bool> {
        let Some(row) = rows.next_row()? else {
            return Ok(false);
        };
        self.text = row.get(1).unwrap_or_default().to_string();
        self.done = !NOT_DONE.is_match(row.get(2).unwrap_or_default().trim());
        Ok(true)
    }

    fn to_plain_string(&self, indent: &str) -> String {
        let mut s = format!("{}{}", indent, self.text);
        if self.done {
            s.push_str(" *");
        }
        s
    }
}
