//! Leaf values for the synthesizer.

use crate::config::SynthConfig;
use avrosynth_core::Value;
use avrosynth_schema::PrimitiveKind;

/// Supplies the values placed at the leaves of a synthesized instance.
///
/// Every value returned must conform to the kind or size it was asked for.
pub trait ValueProvider {
    /// Value for a primitive type.
    fn primitive(&self, kind: PrimitiveKind) -> Value;

    /// Value for a `fixed` of `size` bytes.
    fn fixed(&self, size: usize) -> Value {
        Value::Bytes(vec![0; size])
    }

    /// Key of the single entry of a synthesized map.
    fn map_key(&self) -> String {
        "key".to_string()
    }
}

/// Deterministic provider: `true`, zeros, an empty byte string and a fixed
/// string placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalValues {
    string_placeholder: String,
    map_key: String,
}

impl Default for CanonicalValues {
    fn default() -> Self {
        Self::from_config(&SynthConfig::default())
    }
}

impl CanonicalValues {
    /// Creates the provider with default placeholders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the string placeholder and map key from `config`.
    #[must_use]
    pub fn from_config(config: &SynthConfig) -> Self {
        Self {
            string_placeholder: config.string_placeholder.clone(),
            map_key: config.map_key.clone(),
        }
    }
}

impl ValueProvider for CanonicalValues {
    fn primitive(&self, kind: PrimitiveKind) -> Value {
        match kind {
            PrimitiveKind::Null => Value::Null,
            PrimitiveKind::Boolean => Value::Boolean(true),
            PrimitiveKind::Int | PrimitiveKind::Long => Value::Long(0),
            PrimitiveKind::Float | PrimitiveKind::Double => Value::Double(0.0),
            PrimitiveKind::Bytes => Value::Bytes(Vec::new()),
            PrimitiveKind::String => Value::String(self.string_placeholder.clone()),
        }
    }

    fn map_key(&self) -> String {
        self.map_key.clone()
    }
}
