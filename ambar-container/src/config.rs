//! Declarative scan configuration.
//!
//! ```
//! use ambar_container::config::ContainerConfig;
//!
//! let config = ContainerConfig {
//!     packages: vec!["app::beans".into()],
//!     exclude: vec!["LegacyService".into()],
//! };
//! assert!(!config.is_empty());
//! ```

use serde::Deserialize;

/// Packages to scan and short names to exclude, e.g. loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Namespaces (module paths) to scan.
    pub packages: Vec<String>,
    /// Short type names excluded from scanning.
    pub exclude: Vec<String>,
}

impl ContainerConfig {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.exclude.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let config: ContainerConfig = serde_json::from_str(
            r#"{ "packages": ["app::beans"], "exclude": ["DemoImpl1", "DemoImpl3"] }"#,
        )
        .unwrap();

        assert_eq!(config.packages, vec!["app::beans"]);
        assert_eq!(config.exclude.len(), 2);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let config: ContainerConfig = serde_json::from_str("{}").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result = serde_json::from_str::<ContainerConfig>(r#"{ "scope": "request" }"#);
        assert!(result.is_err());
    }
}
