//! Report configuration loaded from a JSON file.

use crate::error::{Error, Result};
use crate::expand::{SiblingMode, DEFAULT_MAX_DEPTH};
use crate::fields::FieldConfig;
use crate::generator::GenerateOptions;
use crate::row::DEFAULT_LIST_SEPARATOR;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_WORKSHEET_NAME: &str = "Report";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    pub fields: Vec<String>,
    pub group_key: Option<String>,
    pub worksheet_name: Option<String>,
    #[serde(default)]
    pub sibling_mode: SiblingMode,
    pub list_separator: Option<String>,
    pub max_depth: Option<usize>,
}

/// A config file is either the full object or just the list of field paths.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Fields(Vec<String>),
    Full(ReportConfig),
}

impl ReportConfig {
    pub fn from_fields(fields: Vec<String>) -> Self {
        Self {
            fields,
            group_key: None,
            worksheet_name: None,
            sibling_mode: SiblingMode::default(),
            list_separator: None,
            max_depth: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("expected a field list or a config object: {}", e)))?;
        Ok(match file {
            ConfigFile::Fields(fields) => Self::from_fields(fields),
            ConfigFile::Full(config) => config,
        })
    }

    pub fn field_config(&self) -> Result<FieldConfig> {
        FieldConfig::new(&self.fields)
    }

    /// The configured group key, or the first field when none is set.
    pub fn group_key(&self) -> Result<&str> {
        match &self.group_key {
            Some(key) => Ok(key.as_str()),
            None => self
                .fields
                .first()
                .map(String::as_str)
                .ok_or(Error::EmptyFieldConfig),
        }
    }

    pub fn worksheet_name(&self) -> &str {
        self.worksheet_name.as_deref().unwrap_or(DEFAULT_WORKSHEET_NAME)
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            sibling_mode: self.sibling_mode,
            list_separator: self
                .list_separator
                .clone()
                .unwrap_or_else(|| DEFAULT_LIST_SEPARATOR.to_string()),
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}
