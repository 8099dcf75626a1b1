//! Message declaration emitter.

use super::map_entry::AliasTable;
use super::types::{field_key, field_type};
use super::writer::DeclarationWriter;
use crate::error::{Error, Result};
use prost_types::DescriptorProto;
use std::fmt::Write as FmtWrite;

/// One property of the emitted record
#[derive(Debug, Clone, PartialEq, Eq)]
struct Property {
    key: String,
    ty: String,
}

/// Fields of a message split by oneof membership, each group in
/// declaration order
#[derive(Debug, Default)]
struct FieldGroups {
    plain: Vec<Property>,
    oneofs: Vec<Vec<Property>>,
}

fn partition_fields(message: &DescriptorProto, aliases: &AliasTable) -> Result<FieldGroups> {
    let declared = message.oneof_decl.len();
    let mut groups = FieldGroups {
        plain: Vec::new(),
        oneofs: vec![Vec::new(); declared],
    };

    for field in &message.field {
        let property = Property {
            key: field_key(field),
            ty: field_type(field, aliases),
        };

        match field.oneof_index {
            None => groups.plain.push(property),
            Some(index) => {
                let group = usize::try_from(index)
                    .ok()
                    .and_then(|i| groups.oneofs.get_mut(i))
                    .ok_or_else(|| {
                        Error::invalid_oneof_index(message.name(), field.name(), index, declared)
                    })?;
                group.push(property);
            }
        }
    }

    Ok(groups)
}

/// Renders the declaration of one message.
///
/// Plain fields form a `Readonly` record; every non-empty oneof group is
/// intersected onto it as a union whose members each allow exactly one
/// field of the group. A message with neither is declared as `null`.
pub fn render_message(
    message: &DescriptorProto,
    aliases: &AliasTable,
    indent_str: &str,
) -> Result<String> {
    let groups = partition_fields(message, aliases)?;
    let unions: Vec<&[Property]> = groups
        .oneofs
        .iter()
        .filter(|group| !group.is_empty())
        .map(Vec::as_slice)
        .collect();

    let mut output = String::new();
    let mut w = DeclarationWriter::new(&mut output, indent_str);

    if !groups.plain.is_empty() {
        w.line(format_args!("type {} = Readonly<{{", message.name()))?;
        w.indent();
        for property in &groups.plain {
            w.line(format_args!("{}: {};", property.key, property.ty))?;
        }
        w.dedent();
        w.start(format_args!("}}>"))?;
        if !unions.is_empty() {
            w.append(" &\n")?;
        }
    } else if !unions.is_empty() {
        w.line(format_args!("type {} =", message.name()))?;
    } else {
        w.start(format_args!("type {} = null", message.name()))?;
    }

    write_unions(&mut w, &unions)?;
    w.append(";\n")?;

    Ok(output)
}

fn write_unions<W: FmtWrite>(
    w: &mut DeclarationWriter<'_, W>,
    unions: &[&[Property]],
) -> std::fmt::Result {
    w.indent();

    for (i, group) in unions.iter().enumerate() {
        w.line(format_args!("Readonly<"))?;
        w.indent();

        for (present, _) in group.iter().enumerate() {
            w.line(format_args!("{{"))?;
            w.indent();
            for (j, property) in group.iter().enumerate() {
                let ty = if j == present { property.ty.as_str() } else { "never" };
                w.line(format_args!("{}?: {};", property.key, ty))?;
            }
            w.dedent();
            w.start(format_args!("}}"))?;
            w.append(if present + 1 == group.len() { "\n" } else { " |\n" })?;
        }

        w.dedent();
        w.start(format_args!(">"))?;
        if i + 1 < unions.len() {
            w.append(" &\n")?;
        }
    }

    w.dedent();
    Ok(())
}
