//! Scan results - what the vision side hands over each planning cycle

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;
use crate::core::types::Points;
use crate::reference::loader::is_json;

/// One on-screen row, top to bottom order preserved by `ScanResult`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRow {
    /// Name as read off the screen, possibly with OCR artifacts
    pub name: String,
    /// Shown price; absent for obtained rows
    #[serde(default)]
    pub price: Option<Points>,
    #[serde(default)]
    pub obtained: bool,
}

impl ScanRow {
    pub fn new(name: impl Into<String>, price: Points) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
            obtained: false,
        }
    }

    pub fn obtained(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: None,
            obtained: true,
        }
    }
}

/// A single consistent snapshot of the purchase screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Points shown on screen, if the scanner read them
    #[serde(default)]
    pub budget: Option<Points>,
    #[serde(default, alias = "skills")]
    pub rows: Vec<ScanRow>,
}

impl ScanResult {
    pub fn new(rows: Vec<ScanRow>) -> Self {
        Self { budget: None, rows }
    }

    pub fn with_budget(mut self, budget: Points) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Load a scan file, JSON by `.json` extension and TOML otherwise
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_scan() {
        let scan = ScanResult::from_toml_str(
            r#"
budget = 420

[[rows]]
name = "Corner Recovery ○"
price = 119

[[rows]]
name = "Straightaway Adept"
obtained = true
"#,
        )
        .unwrap();
        assert_eq!(scan.budget, Some(420));
        assert_eq!(scan.len(), 2);
        assert_eq!(scan.rows[0], ScanRow::new("Corner Recovery ○", 119));
        assert_eq!(scan.rows[1], ScanRow::obtained("Straightaway Adept"));
    }

    #[test]
    fn test_parse_json_scan() {
        let scan = ScanResult::from_json_str(
            r#"{"skills": [{"name": "Firm Conditions ×", "price": 70}]}"#,
        )
        .unwrap();
        assert_eq!(scan.budget, None);
        assert_eq!(scan.rows[0].price, Some(70));
        assert!(!scan.rows[0].obtained);
    }

    #[test]
    fn test_empty_scan() {
        let scan = ScanResult::from_toml_str("").unwrap();
        assert!(scan.is_empty());
    }
}
