use crate::utils::error::{ListError, Result};
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "checklists")]
#[command(about = "Import, inspect and edit checklist files")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Settings file (TOML)")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Convert a legacy CSV export into one JSON file per checklist
    Import {
        input: String,
        #[arg(long, help = "Output directory (defaults to settings or '.')")]
        out: Option<String>,
    },
    /// Print a checklist as plain text
    Show { input: String },
    /// Print the number of checked and total items
    Count { input: String },
    /// Check every item, or uncheck with --uncheck
    CheckAll {
        input: String,
        #[arg(long)]
        uncheck: bool,
    },
    /// Delete all checked items
    DeleteChecked { input: String },
    /// Write a checklist back out as CSV rows
    ExportCsv {
        input: String,
        #[arg(long, help = "Output file (defaults to stdout)")]
        out: Option<String>,
    },
}

impl Command {
    pub fn input(&self) -> &str {
        match self {
            Command::Import { input, .. }
            | Command::Show { input }
            | Command::Count { input }
            | Command::CheckAll { input, .. }
            | Command::DeleteChecked { input }
            | Command::ExportCsv { input, .. } => input,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = self.command.input();
        validate_path("input", input)?;
        match &self.command {
            Command::Import { out, .. } => {
                validate_file_extension("input", input, &["csv", "txt"])?;
                if let Some(out) = out {
                    validate_path("out", out)?;
                }
            }
            Command::ExportCsv { out, .. } => {
                validate_file_extension("input", input, &["json"])?;
                if let Some(out) = out {
                    validate_path("out", out)?;
                    if out == input {
                        return Err(ListError::ValidationError {
                            message: format!("CSV output '{}' would overwrite the JSON input", out),
                        });
                    }
                }
            }
            _ => validate_file_extension("input", input, &["json"])?,
        }
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_command() {
        let config = CliConfig::parse_from(["checklists", "import", "lists.csv", "--out", "out", "--verbose"]);
        assert!(config.verbose);
        assert!(matches!(
            &config.command,
            Command::Import { input, out: Some(out) } if input == "lists.csv" && out == "out"
        ));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_onto_input_fails_validation() {
        let config = CliConfig::parse_from(["checklists", "export-csv", "list.json", "--out", "list.json"]);
        assert!(matches!(
            config.validate(),
            Err(ListError::ValidationError { .. })
        ));
        let config = CliConfig::parse_from(["checklists", "export-csv", "list.json", "--out", "list.csv"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wrong_extension_fails_validation() {
        let config = CliConfig::parse_from(["checklists", "show", "lists.csv"]);
        assert!(config.validate().is_err());
        let config = CliConfig::parse_from(["checklists", "check-all", "list.json", "--uncheck"]);
        assert!(config.validate().is_ok());
    }
}
