use crate::adapters::csv_rows::{CsvRowReader, CsvRowWriter};
use crate::config::cli::LocalStorage;
use crate::config::toml_config::Settings;
use crate::domain::checklist::{read_all_csv, Checklist, ChecklistUndo};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::path::PathBuf;

/// File-level operations on checklists, driven by [`Settings`].
pub struct ListService {
    settings: Settings,
    files: LocalStorage,
}

impl ListService {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            files: LocalStorage::new(".".to_string()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn load(&self, input: &str) -> Result<Checklist> {
        let content = self.files.read_to_string(input)?;
        Checklist::from_json_str_with_defaults(&content, &self.settings.default_flags())
    }

    pub fn save(&self, checklist: &Checklist, output: &str) -> Result<()> {
        let json = checklist.to_json_string(self.settings.output.pretty_json)?;
        self.files.write_file(output, json.as_bytes())
    }

    /// Splits a legacy CSV export into one JSON file per checklist under
    /// `out_dir`. Existing files are never overwritten; a clashing name gets a
    /// numeric suffix. Returns the written paths in file order.
    pub fn import_csv(&self, input: &str, out_dir: Option<&str>) -> Result<Vec<PathBuf>> {
        let data = self.files.read_file(input)?;
        let mut rows = CsvRowReader::new(data.as_slice());
        let lists = read_all_csv(&mut rows, &self.settings.default_flags())?;
        tracing::info!("Read {} checklists from {} ({} rows)", lists.len(), input, rows.rows_consumed());

        let out_dir = out_dir
            .map(str::to_string)
            .or_else(|| self.settings.output.directory.clone())
            .unwrap_or_else(|| ".".to_string());
        let target = LocalStorage::new(out_dir);

        let mut used = HashSet::new();
        let mut written = Vec::with_capacity(lists.len());
        for list in &lists {
            let file_name = unique_file_name(list.name().unwrap_or("checklist"), &mut used, |candidate| {
                target.full_path(candidate).exists()
            });
            let json = list.to_json_string(self.settings.output.pretty_json)?;
            target.write_file(&file_name, json.as_bytes())?;
            tracing::debug!("Wrote '{}' ({} items) to {}", list.name().unwrap_or_default(), list.len(), file_name);
            written.push(target.full_path(&file_name));
        }
        Ok(written)
    }

    pub fn show(&self, input: &str) -> Result<String> {
        let checklist = self.load(input)?;
        Ok(checklist.to_plain_text("", &self.settings.output.plain_text_indent))
    }

    /// Returns `(checked, total)`.
    pub fn count(&self, input: &str) -> Result<(usize, usize)> {
        let checklist = self.load(input)?;
        Ok((checklist.checked_count(), checklist.len()))
    }

    /// Checks or unchecks everything; the file is rewritten only on change.
    pub fn check_all(&self, input: &str, check: bool) -> Result<bool> {
        let mut checklist = self.load(input)?;
        let changed = checklist.check_all(check);
        if changed {
            self.save(&checklist, input)?;
        }
        tracing::info!("check_all({}) on {}: changed={}", check, input, changed);
        Ok(changed)
    }

    pub fn delete_checked(&self, input: &str) -> Result<usize> {
        let mut checklist = self.load(input)?;
        let mut undo = ChecklistUndo::new();
        let removed = checklist.delete_all_checked(&mut undo);
        if removed > 0 {
            self.save(&checklist, input)?;
        }
        tracing::info!("Deleted {} checked items from {}", removed, input);
        Ok(removed)
    }

    /// Renders the checklist as CSV; writes it to `out` when given.
    pub fn export_csv(&self, input: &str, out: Option<&str>) -> Result<String> {
        let checklist = self.load(input)?;
        let mut sink = CsvRowWriter::new(Vec::new());
        checklist.to_csv(&mut sink)?;
        let bytes = sink.into_inner()?;
        if let Some(out) = out {
            self.files.write_file(out, &bytes)?;
            tracing::info!("Exported {} rows to {}", checklist.len(), out);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    #[cfg(feature = "cli")]
    pub fn run(&self, command: &crate::config::Command) -> Result<String> {
        use crate::config::Command;

        match command {
            Command::Import { input, out } => {
                let written = self.import_csv(input, out.as_deref())?;
                Ok(written
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Show { input } => self.show(input),
            Command::Count { input } => {
                let (checked, total) = self.count(input)?;
                Ok(format!("{}/{} checked", checked, total))
            }
            Command::CheckAll { input, uncheck } => {
                let changed = self.check_all(input, !uncheck)?;
                let status = if changed { "updated" } else { "no change" };
                Ok(status.to_string())
            }
            Command::DeleteChecked { input } => {
                let removed = self.delete_checked(input)?;
                Ok(format!("deleted {} items", removed))
            }
            Command::ExportCsv { input, out } => self.export_csv(input, out.as_deref()),
        }
    }
}

/// File name for a list: unsafe characters become '_'. A name already used in
/// this run or for which `exists` holds gets a numeric suffix.
fn unique_file_name<F>(name: &str, used: &mut HashSet<String>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "checklist".to_string() } else { stem };

    let mut candidate = format!("{}.json", stem);
    let mut n = 2;
    while exists(&candidate) || !used.insert(candidate.clone()) {
        candidate = format!("{}-{}.json", stem, n);
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_file_name() {
        let mut used = HashSet::new();
        let none = |_: &str| false;
        assert_eq!(unique_file_name("Groceries", &mut used, none), "Groceries.json");
        assert_eq!(unique_file_name("Groceries", &mut used, none), "Groceries-2.json");
        assert_eq!(unique_file_name("DIY / garden", &mut used, none), "DIY___garden.json");
        assert_eq!(unique_file_name("", &mut used, none), "checklist.json");
    }

    #[test]
    fn test_unique_file_name_skips_existing_files() {
        let mut used = HashSet::new();
        let on_disk = |name: &str| name == "Groceries.json" || name == "Groceries-2.json";
        assert_eq!(unique_file_name("Groceries", &mut used, on_disk), "Groceries-3.json");
        assert_eq!(unique_file_name("Hardware", &mut used, on_disk), "Hardware.json");
    }
}
