use serde::Deserialize;

use crate::error::ReconError;

/// Reconciliation settings. All fields have working defaults, so an absent
/// or empty config file is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// Unit price applied to billed and delta quantities, in cents.
    #[serde(default = "default_unit_price_cents")]
    pub unit_price_cents: i64,
    /// Sheet-name fragments identifying the billing sheet, matched
    /// case-insensitively.
    #[serde(default = "default_billing_keywords")]
    pub billing_keywords: Vec<String>,
    /// Sheet-name fragments identifying the physical-count sheet.
    #[serde(default = "default_triage_keywords")]
    pub triage_keywords: Vec<String>,
}

fn default_unit_price_cents() -> i64 {
    276
}

fn default_billing_keywords() -> Vec<String> {
    vec!["devol".into(), "cobran".into()]
}

fn default_triage_keywords() -> Vec<String> {
    vec!["triagem".into()]
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            unit_price_cents: default_unit_price_cents(),
            billing_keywords: default_billing_keywords(),
            triage_keywords: default_triage_keywords(),
        }
    }
}

impl ReconcileConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconcileConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.unit_price_cents <= 0 {
            return Err(ReconError::ConfigValidation(format!(
                "unit_price_cents must be positive, got {}",
                self.unit_price_cents
            )));
        }
        for (field, keywords) in [
            ("billing_keywords", &self.billing_keywords),
            ("triage_keywords", &self.triage_keywords),
        ] {
            if keywords.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{field} must list at least one keyword"
                )));
            }
            if keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{field} contains a blank keyword"
                )));
            }
        }
        Ok(())
    }
}
