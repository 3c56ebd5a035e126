//! Tree configuration.
//!
//! The tree never rebuilds itself. [`TreeConfig`] only describes when a caller
//! *should* rebuild, and [`crate::KdTree::needs_rebuild`] evaluates it.
use crate::error::{IndexError, Result};
use serde::de::Error;

/// Rebuild policy thresholds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    /// Fraction of dead routing nodes, out of all nodes, above which a rebuild
    /// is recommended.
    #[serde(default = "TreeConfig::default_max_dead_ratio")]
    pub max_dead_ratio: f64,

    /// A rebuild is recommended once depth exceeds this multiple of the
    /// balanced depth `ceil(log2(nodes + 1))`.
    #[serde(default = "TreeConfig::default_max_depth_factor")]
    pub max_depth_factor: f64,

    /// Trees with fewer nodes than this are never worth rebuilding.
    #[serde(default = "TreeConfig::default_min_nodes_for_rebuild")]
    pub min_nodes_for_rebuild: usize,
}

impl TreeConfig {
    const fn default_max_dead_ratio() -> f64 {
        0.5
    }

    const fn default_max_depth_factor() -> f64 {
        4.0
    }

    const fn default_min_nodes_for_rebuild() -> usize {
        64
    }

    pub fn with_max_dead_ratio(mut self, ratio: f64) -> Self {
        assert!(
            ratio > 0.0 && ratio <= 1.0,
            "Dead ratio must be in (0.0, 1.0]"
        );
        if ratio > 0.9 {
            log::warn!(
                "Dead ratio of {} lets nearly every node become a routing stub before rebuilding",
                ratio
            );
        }
        self.max_dead_ratio = ratio;
        self
    }

    pub fn with_max_depth_factor(mut self, factor: f64) -> Self {
        assert!(factor >= 1.0, "Depth factor must be at least 1.0");
        self.max_depth_factor = factor;
        self
    }

    pub fn with_min_nodes_for_rebuild(mut self, nodes: usize) -> Self {
        self.min_nodes_for_rebuild = nodes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_dead_ratio > 0.0 && self.max_dead_ratio <= 1.0) {
            return Err(IndexError::InvalidConfig(format!(
                "max_dead_ratio must be in (0.0, 1.0], got {}",
                self.max_dead_ratio
            )));
        }

        if !(self.max_depth_factor >= 1.0) || !self.max_depth_factor.is_finite() {
            return Err(IndexError::InvalidConfig(format!(
                "max_depth_factor must be a finite value >= 1.0, got {}",
                self.max_depth_factor
            )));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: TreeConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: TreeConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_dead_ratio: Self::default_max_dead_ratio(),
            max_depth_factor: Self::default_max_depth_factor(),
            min_nodes_for_rebuild: Self::default_min_nodes_for_rebuild(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TreeConfig::default();
        assert_eq!(config.max_dead_ratio, 0.5);
        assert_eq!(config.max_depth_factor, 4.0);
        assert_eq!(config.min_nodes_for_rebuild, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = TreeConfig::default()
            .with_max_dead_ratio(0.25)
            .with_max_depth_factor(3.0)
            .with_min_nodes_for_rebuild(10);

        let json = config.to_json().unwrap();
        let deserialized = TreeConfig::from_json(&json).unwrap();

        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = TreeConfig::from_json(r#"{ "max_dead_ratio": 0.75 }"#).unwrap();
        assert_eq!(config.max_dead_ratio, 0.75);
        assert_eq!(config.min_nodes_for_rebuild, 64);
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(TreeConfig::from_json(r#"{ "max_dead_ratio": 0.0 }"#).is_err());
        assert!(TreeConfig::from_json(r#"{ "max_depth_factor": 0.5 }"#).is_err());
        assert!(TreeConfig::from_json(r#"{ "unknown": 1 }"#).is_err());
    }

    #[test]
    #[should_panic(expected = "Depth factor must be at least 1.0")]
    fn test_config_builder_panics_on_bad_factor() {
        let _ = TreeConfig::default().with_max_depth_factor(0.1);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_roundtrip() {
        let config = TreeConfig::default().with_max_dead_ratio(0.3);
        let text = config.to_toml().unwrap();
        assert_eq!(TreeConfig::from_toml(&text).unwrap(), config);
    }
}
