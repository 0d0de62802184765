//! Interaction tuning loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::collision::LINE_THRESHOLD;
use crate::error::{GeometryError, GeometryResult};
use crate::handles::PointerType;

/// Settings read by the hit-test engine and the handle generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Distance (in unscaled canvas units) within which a point touches an edge.
    pub line_threshold: f64,
    /// Pointer device assumed when the caller does not supply one.
    pub pointer_type: PointerType,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            line_threshold: LINE_THRESHOLD,
            pointer_type: PointerType::Mouse,
        }
    }
}

impl InteractionConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> GeometryResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GeometryResult<()> {
        if !self.line_threshold.is_finite() || self.line_threshold < 0.0 {
            return Err(GeometryError::InvalidConfig(format!(
                "line_threshold must be a non-negative number, got {}",
                self.line_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = InteractionConfig::from_json("{}").unwrap();
        assert_eq!(config, InteractionConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config =
            InteractionConfig::from_json(r#"{"line_threshold": 4.5, "pointer_type": "touch"}"#)
                .unwrap();
        assert!((config.line_threshold - 4.5).abs() < f64::EPSILON);
        assert_eq!(config.pointer_type, PointerType::Touch);
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let err = InteractionConfig::from_json(r#"{"line_threshold": -1.0}"#).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidConfig(_)));
    }

    #[test]
    fn test_reports_parse_errors() {
        let err = InteractionConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, GeometryError::Config(_)));
    }
}
