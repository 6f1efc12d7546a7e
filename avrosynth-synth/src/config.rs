//! Synthesis configuration.

use crate::error::SynthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which union member the synthesizer expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnionPolicy {
    /// The last non-null member when the union contains `null` alongside
    /// other members, otherwise the first member.
    #[default]
    LastNonNull,
    /// Always the first member.
    First,
}

impl UnionPolicy {
    /// Returns the policy name as used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LastNonNull => "last-non-null",
            Self::First => "first",
        }
    }
}

impl fmt::Display for UnionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnionPolicy {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-non-null" => Ok(Self::LastNonNull),
            "first" => Ok(Self::First),
            other => Err(SynthError::UnknownUnionPolicy {
                value: other.to_string(),
            }),
        }
    }
}

/// Synthesis settings.
///
/// Built with consuming setters or loaded from JSON; missing keys take their
/// defaults.
///
/// # Example
/// ```
/// use avrosynth_synth::{SynthConfig, UnionPolicy};
///
/// let config = SynthConfig::new()
///     .union_policy(UnionPolicy::First)
///     .map_key("k");
/// assert_eq!(config.map_key, "k");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Union branch selection.
    pub union_policy: UnionPolicy,
    /// Use a field's explicit default when it conforms to the field type.
    pub use_field_defaults: bool,
    /// Emit an empty array or map when its element would be a cycle cut.
    pub empty_collections_on_cycle: bool,
    /// Key of the single map entry.
    pub map_key: String,
    /// Value used for `string`; never empty.
    pub string_placeholder: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            union_policy: UnionPolicy::LastNonNull,
            use_field_defaults: false,
            empty_collections_on_cycle: true,
            map_key: "key".to_string(),
            string_placeholder: "string".to_string(),
        }
    }
}

impl SynthConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON text.
    ///
    /// # Errors
    /// Returns [`SynthError::Config`] if the text is not a valid configuration,
    /// or [`SynthError::EmptyPlaceholder`] for an empty `string_placeholder`.
    pub fn from_json(text: &str) -> Result<Self, SynthError> {
        let config: Self = serde_json::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Checks settings that the type system does not.
    ///
    /// # Errors
    /// Returns [`SynthError::EmptyPlaceholder`] for an empty `string_placeholder`.
    pub fn check(&self) -> Result<(), SynthError> {
        if self.string_placeholder.is_empty() {
            return Err(SynthError::EmptyPlaceholder);
        }
        Ok(())
    }

    /// Sets the union policy.
    #[must_use]
    pub fn union_policy(mut self, policy: UnionPolicy) -> Self {
        self.union_policy = policy;
        self
    }

    /// Enables or disables explicit field defaults.
    #[must_use]
    pub fn use_field_defaults(mut self, enabled: bool) -> Self {
        self.use_field_defaults = enabled;
        self
    }

    /// Enables or disables empty collections over cycle cuts.
    #[must_use]
    pub fn empty_collections_on_cycle(mut self, enabled: bool) -> Self {
        self.empty_collections_on_cycle = enabled;
        self
    }

    /// Sets the map entry key.
    #[must_use]
    pub fn map_key(mut self, key: impl Into<String>) -> Self {
        self.map_key = key.into();
        self
    }

    /// Sets the string placeholder.
    ///
    /// # Errors
    /// Returns [`SynthError::EmptyPlaceholder`] if `value` is empty.
    pub fn string_placeholder(mut self, value: impl Into<String>) -> Result<Self, SynthError> {
        self.string_placeholder = value.into();
        self.check()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SynthConfig::default();
        assert_eq!(config.union_policy, UnionPolicy::LastNonNull);
        assert!(!config.use_field_defaults);
        assert!(config.empty_collections_on_cycle);
        assert_eq!(config.map_key, "key");
        assert_eq!(config.string_placeholder, "string");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SynthConfig::from_json(r#"{"union_policy":"first","map_key":"id"}"#)
            .expect("Failed to load config");
        assert_eq!(config.union_policy, UnionPolicy::First);
        assert_eq!(config.map_key, "id");
        assert!(config.empty_collections_on_cycle);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SynthConfig::from_json(r#"{"union_policy":"random"}"#),
            Err(SynthError::Config(_))
        ));
    }

    #[test]
    fn test_empty_placeholder_rejected() {
        assert!(matches!(
            SynthConfig::from_json(r#"{"string_placeholder":""}"#),
            Err(SynthError::EmptyPlaceholder)
        ));
        assert!(matches!(
            SynthConfig::new().string_placeholder(""),
            Err(SynthError::EmptyPlaceholder)
        ));
    }

    #[test]
    fn test_union_policy_from_str() {
        assert_eq!("first".parse::<UnionPolicy>().expect("parse"), UnionPolicy::First);
        assert_eq!(
            UnionPolicy::LastNonNull.to_string().parse::<UnionPolicy>().expect("parse"),
            UnionPolicy::LastNonNull
        );
        assert!("last".parse::<UnionPolicy>().is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = SynthConfig::new()
            .use_field_defaults(true)
            .empty_collections_on_cycle(false)
            .string_placeholder("lorem")
            .expect("non-empty placeholder");
        assert!(config.use_field_defaults);
        assert!(!config.empty_collections_on_cycle);
        assert_eq!(config.string_placeholder, "lorem");
    }
}
