//! Application settings loading from config.toml
//!
//! Every setting has a default, so a missing config.toml yields a working
//! configuration. The categories listed here seed the database on first run;
//! categories that already exist are left untouched.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Database URL; the `DATABASE_URL` environment variable takes precedence
    pub database_url: Option<String>,
    /// Symbol printed in front of amounts
    pub currency_symbol: String,
    /// Payee details used for UPI payment requests
    pub upi: UpiSettings,
    /// Categories to seed, with their monthly budgets
    pub categories: Vec<CategoryConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            currency_symbol: "₹".to_string(),
            upi: UpiSettings::default(),
            categories: default_categories(),
        }
    }
}

impl AppConfig {
    /// Picks the database URL: explicit override, then config file, then the default.
    #[must_use]
    pub fn database_url(&self, override_url: Option<&str>) -> String {
        override_url
            .or(self.database_url.as_deref())
            .unwrap_or(DEFAULT_DATABASE_URL)
            .to_string()
    }
}

/// Payee details written into `upi://pay` links
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UpiSettings {
    /// Payee virtual payment address
    pub payee_address: String,
    /// Payee display name
    pub payee_name: String,
    /// ISO currency code
    pub currency: String,
}

impl Default for UpiSettings {
    fn default() -> Self {
        Self {
            payee_address: "expensetracker@upi".to_string(),
            payee_name: "Expense Tracker".to_string(),
            currency: "INR".to_string(),
        }
    }
}

/// Configuration for a single seeded category
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CategoryConfig {
    /// Name of the category
    pub name: String,
    /// Monthly budget
    #[serde(default)]
    pub budget: f64,
}

/// The categories a fresh database starts with.
#[must_use]
pub fn default_categories() -> Vec<CategoryConfig> {
    [
        ("Food", 5000.0),
        ("Transportation", 3000.0),
        ("Entertainment", 2000.0),
        ("Utilities", 4000.0),
        ("Rent", 15000.0),
        ("Shopping", 3000.0),
        ("Healthcare", 2000.0),
        ("Others", 1000.0),
    ]
    .into_iter()
    .map(|(name, budget)| CategoryConfig {
        name: name.to_string(),
        budget,
    })
    .collect()
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `path`, falling back to defaults when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }
    load_config(path)
}
