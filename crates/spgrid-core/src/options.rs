//! Construction-time configuration of a grid instance
//!
//! Options can be written as TOML or JSON; keys use the camelCase names of
//! the embedding page (`apiUrl`, `spName`, `selectFields`, ...).
//!
//! ```toml
//! apiUrl = "https://example.test/api/procedures"
//! spName = "sp_inventory"
//! schemaColumns = "id,item,QtyBag,RegDate"
//! tableName = "Inventory"
//! containerId = "inventory"
//!
//! [selectFields.item]
//! columnsToInclude = "item"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{GridError, GridResult};

fn default_page_length() -> usize {
    10
}

fn default_length_menu() -> Vec<usize> {
    vec![5, 10, 25, 50]
}

/// How insert/update values travel to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueEncoding {
    /// Values are sent as a typed JSON array aligned with the field list.
    #[default]
    Parameterized,
    /// Values are single-quoted and comma-joined into one string, for servers
    /// that splice the list into SQL text.
    QuotedList,
}

/// Per-field drop-down configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFieldConfig {
    /// Value sent as `columnsToInclude` when fetching options; defaults to the field name.
    #[serde(default)]
    pub columns_to_include: Option<String>,
    /// Property of each option row holding the value; defaults to the upper-cased field name.
    #[serde(default)]
    pub value_key: Option<String>,
}

/// Options recognized when constructing a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    /// Endpoint receiving every procedure call
    pub api_url: String,
    /// Stored procedure identifier sent as `Name`
    pub sp_name: String,
    /// Comma-separated field list, e.g. `item,whF,QtyBag,RegDate`
    pub schema_columns: String,
    pub table_name: String,
    /// Mount point of the grid
    pub container_id: String,
    #[serde(default)]
    pub custom_class: String,
    #[serde(default)]
    pub select_fields: IndexMap<String, SelectFieldConfig>,
    #[serde(default = "default_page_length")]
    pub page_length: usize,
    #[serde(default = "default_length_menu")]
    pub length_menu: Vec<usize>,
    #[serde(default)]
    pub language_url: Option<String>,
    #[serde(default)]
    pub value_encoding: ValueEncoding,
}

impl GridOptions {
    pub fn new(
        api_url: impl Into<String>,
        sp_name: impl Into<String>,
        schema_columns: impl Into<String>,
        table_name: impl Into<String>,
        container_id: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            sp_name: sp_name.into(),
            schema_columns: schema_columns.into(),
            table_name: table_name.into(),
            container_id: container_id.into(),
            custom_class: String::new(),
            select_fields: IndexMap::new(),
            page_length: default_page_length(),
            length_menu: default_length_menu(),
            language_url: None,
            value_encoding: ValueEncoding::default(),
        }
    }

    /// Register `field` as a drop-down.
    pub fn with_select_field(mut self, field: impl Into<String>, config: SelectFieldConfig) -> Self {
        self.select_fields.insert(field.into(), config);
        self
    }

    pub fn with_value_encoding(mut self, encoding: ValueEncoding) -> Self {
        self.value_encoding = encoding;
        self
    }

    pub fn from_toml_str(text: &str) -> GridResult<Self> {
        let options: Self = toml::from_str(text)
            .map_err(|e| GridError::Configuration(format!("invalid TOML options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_str(text: &str) -> GridResult<Self> {
        let options: Self = serde_json::from_str(text)
            .map_err(|e| GridError::Configuration(format!("invalid JSON options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> GridResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            GridError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        tracing::debug!(path = %path.display(), is_json, "Loading grid options");

        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    pub fn validate(&self) -> GridResult<()> {
        let required = [
            ("apiUrl", &self.api_url),
            ("spName", &self.sp_name),
            ("schemaColumns", &self.schema_columns),
            ("tableName", &self.table_name),
            ("containerId", &self.container_id),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(GridError::Configuration(format!("{} must not be empty", key)));
            }
        }

        url::Url::parse(&self.api_url)
            .map_err(|e| GridError::Configuration(format!("invalid apiUrl {}: {}", self.api_url, e)))?;

        if self.page_length == 0 {
            return Err(GridError::Configuration("pageLength must be positive".to_string()));
        }

        Ok(())
    }

    /// Select configuration of a field, matched case-insensitively.
    pub fn select_field(&self, field: &str) -> Option<&SelectFieldConfig> {
        self.select_fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, config)| config)
    }

    /// Individual names of `schema_columns`.
    pub fn schema_column_list(&self) -> Vec<&str> {
        self.schema_columns
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
