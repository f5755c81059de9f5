use crate::domain::flags::{Flag, FlagSet};
use crate::utils::error::{ListError, Result};
use crate::utils::validation::{validate_indent, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User settings read from a TOML file. Every section and field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub lists: ListDefaults,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Flags given to lists created by CSV import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDefaults {
    #[serde(default)]
    pub force_alpha_sort: bool,
    #[serde(default)]
    pub move_checked_to_end: bool,
    #[serde(default)]
    pub auto_delete_checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
    #[serde(default = "default_indent")]
    pub plain_text_indent: String,
    pub directory: Option<String>,
}

fn default_pretty_json() -> bool {
    true
}

fn default_indent() -> String {
    "  ".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: default_pretty_json(),
            plain_text_indent: default_indent(),
            directory: None,
        }
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ListError::ConfigError {
            message: format!("cannot read settings file {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        let settings: Settings = toml::from_str(&processed)?;
        Ok(settings)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn default_flags(&self) -> FlagSet {
        let mut flags = FlagSet::new();
        flags.put(Flag::Sort, self.lists.force_alpha_sort);
        flags.put(Flag::MoveCheckedItemsToEnd, self.lists.move_checked_to_end);
        flags.put(Flag::AutoDeleteChecked, self.lists.auto_delete_checked);
        flags
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_indent("output.plain_text_indent", &self.output.plain_text_indent)?;
        if let Some(dir) = &self.output.directory {
            validate_path("output.directory", dir)?;
        }
        Ok(())
    }
}
