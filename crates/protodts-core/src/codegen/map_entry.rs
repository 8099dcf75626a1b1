//! Map-entry detection.
//!
//! protoc lowers every `map<K, V>` field into a repeated reference to a
//! synthetic nested `XxxEntry` message. Those entries are the only nested
//! types this generator accepts; each one becomes an alias for a keyed
//! record type.

use super::types::{field_type, FieldKind};
use crate::error::{Error, Result};
use prost_types::DescriptorProto;
use tracing::{trace, warn};

/// Map-entry aliases of one message, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as an alias for `mapping`, replacing an earlier
    /// registration of the same name in place
    pub fn insert(&mut self, name: impl Into<String>, mapping: impl Into<String>) {
        let name = name.into();
        let mapping = mapping.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = mapping,
            None => self.entries.push((name, mapping)),
        }
    }

    /// Looks up the mapping registered for an entry name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, mapping)| mapping.as_str())
    }

    /// Number of registered aliases
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no alias is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(entry name, mapping)` in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, m)| (n.as_str(), m.as_str()))
    }
}

/// Returns true if the nested type is a synthetic map entry
pub fn is_map_entry(nested: &DescriptorProto) -> bool {
    nested.options.as_ref().is_some_and(|o| o.map_entry())
}

/// Builds the alias table for a message's nested types.
///
/// Entries are registered strictly in declaration order. A value type that
/// refers to an entry declared later in the same message is therefore left
/// as a plain named reference.
pub fn detect_map_entries(message: &DescriptorProto) -> Result<AliasTable> {
    let mut aliases = AliasTable::new();

    for nested in &message.nested_type {
        if !is_map_entry(nested) {
            return Err(Error::unsupported_nested_type(message.name(), nested.name()));
        }

        let [key, value] = nested.field.as_slice() else {
            return Err(Error::malformed_map_entry(
                message.name(),
                nested.name(),
                nested.field.len(),
            ));
        };

        if let FieldKind::MessageRef(target) = FieldKind::of(value) {
            let target = target.rsplit('.').next().unwrap_or(target);
            let declared_later = message
                .nested_type
                .iter()
                .any(|n| n.name() == target && is_map_entry(n));
            if declared_later && aliases.get(target).is_none() {
                warn!(
                    "Map entry {}.{} refers to {} before it is declared; it will not resolve to a mapping",
                    message.name(),
                    nested.name(),
                    target
                );
            }
        }

        let mapping = format!(
            "{{ [key: {}]: {}; }}",
            field_type(key, &aliases),
            field_type(value, &aliases)
        );
        trace!("Alias {}.{} -> {}", message.name(), nested.name(), mapping);
        aliases.insert(nested.name(), mapping);
    }

    Ok(aliases)
}
