//! Field type mapping.
//!
//! A field is first classified into a closed [`FieldKind`], resolved to a
//! TypeScript expression, then post-processed against the map-entry
//! [`AliasTable`] and its repeated label.

use super::map_entry::AliasTable;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::FieldDescriptorProto;

/// Expression used for field types that have no TypeScript counterpart
pub(crate) const UNRECOGNIZED_TYPE: &str = "unknown";

/// Package holding the well-known wrapper messages
pub(crate) const WELL_KNOWN_PACKAGE: &str = "google.protobuf";

/// Well-known scalar wrappers and the nullable primitive they stand for.
///
/// Keyed by fully-qualified name without the leading dot.
const WELL_KNOWN_WRAPPERS: &[(&str, &str)] = &[
    ("google.protobuf.DoubleValue", "number | null"),
    ("google.protobuf.FloatValue", "number | null"),
    ("google.protobuf.Int64Value", "number | null"),
    ("google.protobuf.UInt64Value", "number | null"),
    ("google.protobuf.Int32Value", "number | null"),
    ("google.protobuf.UInt32Value", "number | null"),
    ("google.protobuf.BoolValue", "boolean | null"),
    ("google.protobuf.StringValue", "string | null"),
    ("google.protobuf.BytesValue", "string | null"),
];

/// Shape of a field's declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind<'a> {
    /// Any integer or floating-point scalar
    Numeric,
    /// `bool`
    Boolean,
    /// `string` or `bytes`
    String,
    /// Reference to an enum, by (usually fully-qualified) name
    EnumRef(&'a str),
    /// Reference to a message, by (usually fully-qualified) name
    MessageRef(&'a str),
    /// Groups, unset or unknown type values
    Unrecognized,
}

impl<'a> FieldKind<'a> {
    /// Classifies a field descriptor
    pub fn of(field: &'a FieldDescriptorProto) -> Self {
        // The raw value is checked so an unset type is not read as the
        // enum's default variant.
        let Some(ty) = field.r#type.and_then(|t| Type::try_from(t).ok()) else {
            return FieldKind::Unrecognized;
        };

        match ty {
            Type::Double
            | Type::Float
            | Type::Int64
            | Type::Uint64
            | Type::Int32
            | Type::Fixed64
            | Type::Fixed32
            | Type::Uint32
            | Type::Sfixed32
            | Type::Sfixed64
            | Type::Sint32
            | Type::Sint64 => FieldKind::Numeric,
            Type::Bool => FieldKind::Boolean,
            Type::String | Type::Bytes => FieldKind::String,
            Type::Enum => FieldKind::EnumRef(field.type_name()),
            Type::Message => FieldKind::MessageRef(field.type_name()),
            Type::Group => FieldKind::Unrecognized,
        }
    }

    /// Resolves the kind to a TypeScript type expression, before any
    /// alias or repeated-label processing
    pub fn resolve(&self) -> String {
        match self {
            FieldKind::Numeric => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::String => "string".to_string(),
            FieldKind::EnumRef(name) => short_name(name).to_string(),
            FieldKind::MessageRef(name) => match wrapper_type(name) {
                Some(nullable) => nullable.to_string(),
                None => short_name(name).to_string(),
            },
            FieldKind::Unrecognized => UNRECOGNIZED_TYPE.to_string(),
        }
    }
}

/// Maps a field onto its TypeScript type expression.
///
/// A name registered in `aliases` resolves to the read-only mapping and is
/// never additionally wrapped as an array, even though map fields always
/// carry the repeated label.
pub fn field_type(field: &FieldDescriptorProto, aliases: &AliasTable) -> String {
    let resolved = FieldKind::of(field).resolve();

    if let Some(mapping) = aliases.get(&resolved) {
        format!("Readonly<{}>", mapping)
    } else if field.label() == Label::Repeated {
        format!("ReadonlyArray<{}>", resolved)
    } else {
        resolved
    }
}

/// Returns the property key used for a field in the declaration
pub fn field_key(field: &FieldDescriptorProto) -> String {
    match field.json_name.as_deref() {
        Some(json_name) if !json_name.is_empty() => json_name.to_string(),
        _ => to_lower_camel_case(field.name()),
    }
}

/// Returns the nullable primitive for a well-known wrapper type name
pub fn wrapper_type(type_name: &str) -> Option<&'static str> {
    let name = type_name.strip_prefix('.').unwrap_or(type_name);
    WELL_KNOWN_WRAPPERS
        .iter()
        .find(|(wrapper, _)| *wrapper == name)
        .map(|(_, nullable)| *nullable)
}

/// Returns true if the message is one of the well-known wrappers itself
pub fn is_wrapper_message(package: &str, message: &str) -> bool {
    package == WELL_KNOWN_PACKAGE && wrapper_type(&format!("{}.{}", package, message)).is_some()
}

/// Last dot-separated segment of a type name
fn short_name(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}

/// Convert a snake_case name to lowerCamelCase
fn to_lower_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
