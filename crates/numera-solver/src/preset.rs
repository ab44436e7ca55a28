use std::collections::BTreeMap;

use crate::InstanceHandling;

/// The stored configuration of one strategy.
///
/// A list of presets describes a whole pipeline: order, enabled and locked flags,
/// instance handling and string-keyed settings. Loading and saving the list is up to the
/// caller.
///
/// # Examples
///
/// ```
/// use numera_solver::{StrategyPreset, StrategyRegistry};
///
/// let registry = StrategyRegistry::standard();
/// let mut presets = registry.default_preset();
/// presets.retain(|p| p.name != "Brute Force");
/// let strategies = registry.build(&presets)?;
/// assert_eq!(strategies.len(), presets.len());
/// # Ok::<(), numera_solver::SolverError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StrategyPreset {
    /// Registry name of the strategy.
    pub name: String,
    /// Whether the pipeline runs it.
    pub enabled: bool,
    /// Whether it can be disabled.
    #[serde(default)]
    pub locked: bool,
    /// What one application commits.
    #[serde(default)]
    pub handling: InstanceHandling,
    /// Setting overrides, by key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults() {
        let preset: StrategyPreset =
            serde_json::from_str(r#"{ "name": "X-Wing", "enabled": false }"#).unwrap();
        assert_eq!(
            preset,
            StrategyPreset {
                name: "X-Wing".to_owned(),
                enabled: false,
                locked: false,
                handling: InstanceHandling::FirstOnly,
                settings: BTreeMap::new(),
            }
        );
    }

    #[test]
    fn test_json_full() {
        let json = r#"{
            "name": "XY-Chain",
            "enabled": true,
            "locked": false,
            "handling": "sorted_all",
            "settings": { "max_length": "8" }
        }"#;
        let preset: StrategyPreset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.handling, InstanceHandling::SortedAll);
        assert_eq!(preset.settings["max_length"], "8");

        let back = serde_json::to_string(&preset).unwrap();
        assert!(back.contains(r#""handling":"sorted_all""#), "{back}");
    }
}
