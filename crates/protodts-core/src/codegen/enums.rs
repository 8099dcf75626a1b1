//! Enum declaration emitter.

use super::writer::DeclarationWriter;
use crate::error::Result;
use prost_types::EnumDescriptorProto;

/// Renders an enum as a union of its value names as string literals.
///
/// Values keep declaration order; aliased values with identical names are
/// emitted once per declaration.
pub fn render_enum(enum_type: &EnumDescriptorProto, indent_str: &str) -> Result<String> {
    let mut output = String::new();
    let mut w = DeclarationWriter::new(&mut output, indent_str);

    if enum_type.value.is_empty() {
        w.line(format_args!("type {} = never;", enum_type.name()))?;
        return Ok(output);
    }

    w.line(format_args!("type {} =", enum_type.name()))?;
    w.indent();
    let last = enum_type.value.len() - 1;
    for (i, value) in enum_type.value.iter().enumerate() {
        let terminator = if i == last { ";" } else { "" };
        w.line(format_args!("| '{}'{}", value.name(), terminator))?;
    }

    Ok(output)
}
