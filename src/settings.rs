//! # Settings Module
//!
//! ## Purpose
//! Wall-function configuration as it appears in the boundary-condition entry of a case:
//! ```json
//! { "maxIter": 1000, "tolerance": 1e-14, "kappa": 0.41, "E": 9.8 }
//! ```
//! Every key is optional and falls back to its default. When the settings are written
//! back only the keys that differ from the defaults are emitted, so an untouched
//! configuration serializes to an empty object.
//!
//! ## Defaults
//! | Key | Default | Meaning |
//! |-----|---------|---------|
//! | "maxIter" | 1000 | Newton iteration cap per face |
//! | "tolerance" | 1e-14 | relative u_tau change that stops the iteration |
//! | "kappa" | 0.41 | von Karman constant |
//! | "E" | 9.8 | log-law intercept constant |
//!
//! Any tolerance other than 1e-14 also activates the converged-face short-circuit of
//! `calc_turbulent_viscosity`.

use crate::WallFunctions::spalding::{
    DEFAULT_E, DEFAULT_KAPPA, DEFAULT_MAX_ITER, DEFAULT_TOLERANCE, SolverParams,
};
use crate::WallFunctions::wall_function_error::WallFunctionError;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallFunctionSettings {
    #[serde(rename = "maxIter")]
    pub max_iter: u32,
    pub tolerance: f64,
    pub kappa: f64,
    pub E: f64,
}

impl Default for WallFunctionSettings {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            tolerance: DEFAULT_TOLERANCE,
            kappa: DEFAULT_KAPPA,
            E: DEFAULT_E,
        }
    }
}

impl WallFunctionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from a JSON object, missing keys take their defaults.
    ///
    /// # Example
    /// ```rust, ignore
    /// let settings = WallFunctionSettings::from_json_str(r#"{"tolerance": 1e-6}"#)?;
    /// assert_eq!(settings.max_iter, 1000);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, WallFunctionError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_value(value: Value) -> Result<Self, WallFunctionError> {
        let settings: Self = serde_json::from_value(value)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), WallFunctionError> {
        let invalid = |name: &str, value: String| WallFunctionError::InvalidSetting {
            name: name.to_string(),
            value,
        };
        if self.max_iter == 0 {
            return Err(invalid("maxIter", self.max_iter.to_string()));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(invalid("tolerance", self.tolerance.to_string()));
        }
        if !self.kappa.is_finite() || self.kappa <= 0.0 {
            return Err(invalid("kappa", self.kappa.to_string()));
        }
        if !self.E.is_finite() || self.E <= 0.0 {
            return Err(invalid("E", self.E.to_string()));
        }
        Ok(())
    }

    pub fn custom_tolerance(&self) -> bool {
        self.tolerance != DEFAULT_TOLERANCE
    }

    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            kappa: self.kappa,
            E: self.E,
            tolerance: self.tolerance,
            max_iter: self.max_iter,
        }
    }

    /// Entries that differ from the defaults, in dictionary spelling.
    pub fn write_entries(&self) -> Map<String, Value> {
        let defaults = Self::default();
        let mut entries = Map::new();
        if self.max_iter != defaults.max_iter {
            entries.insert("maxIter".to_string(), Value::from(self.max_iter));
        }
        if self.tolerance != defaults.tolerance {
            entries.insert("tolerance".to_string(), Value::from(self.tolerance));
        }
        if self.kappa != defaults.kappa {
            entries.insert("kappa".to_string(), Value::from(self.kappa));
        }
        if self.E != defaults.E {
            entries.insert("E".to_string(), Value::from(self.E));
        }
        debug!("wall function entries to write: {:?}", entries);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_object() {
        let settings = WallFunctionSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, WallFunctionSettings::default());
        assert_eq!(settings.max_iter, 1000);
        assert_eq!(settings.tolerance, 1e-14);
        assert!(!settings.custom_tolerance());
    }

    #[test]
    fn test_partial_dictionary() {
        let settings =
            WallFunctionSettings::from_value(json!({"maxIter": 20, "tolerance": 1e-6})).unwrap();
        assert_eq!(settings.max_iter, 20);
        assert_eq!(settings.tolerance, 1e-6);
        assert_eq!(settings.kappa, 0.41);
        assert_eq!(settings.E, 9.8);
        assert!(settings.custom_tolerance());

        let params = settings.solver_params();
        assert_eq!(params.max_iter, 20);
        assert!(params.custom_tolerance());
    }

    #[test]
    fn test_write_entries_only_non_default() {
        assert!(WallFunctionSettings::default().write_entries().is_empty());

        let mut settings = WallFunctionSettings::new();
        settings.tolerance = 1e-8;
        let entries = settings.write_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get("tolerance"), Some(&json!(1e-8)));

        settings.max_iter = 50;
        let entries = settings.write_entries();
        assert_eq!(entries.get("maxIter"), Some(&json!(50)));
        assert!(entries.get("kappa").is_none());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = WallFunctionSettings::from_value(json!({"maxIter": 0}));
        assert!(matches!(
            result,
            Err(WallFunctionError::InvalidSetting { name, .. }) if name == "maxIter"
        ));
        let result = WallFunctionSettings::from_value(json!({"tolerance": -1.0}));
        assert!(matches!(
            result,
            Err(WallFunctionError::InvalidSetting { name, .. }) if name == "tolerance"
        ));
        let result = WallFunctionSettings::from_value(json!({"kappa": 0.0}));
        assert!(result.is_err());
        let result = WallFunctionSettings::from_json_str("{\"E\": \"nine\"}");
        assert!(matches!(result, Err(WallFunctionError::Serde(_))));
    }
}
