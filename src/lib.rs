pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::csv_rows::{CsvRowReader, CsvRowWriter};
pub use app::ListService;
pub use config::toml_config::Settings;
pub use domain::checklist::{read_all_csv, Checklist, ChecklistUndo};
pub use domain::checklist_item::ChecklistItem;
pub use domain::entry_list::{EntryList, EntryListItem};
pub use domain::flags::{Flag, FlagSet};
pub use domain::undo::UndoLog;
pub use utils::error::{ListError, Result};
