//! TypeScript declaration generation module.
//!
//! This module turns parsed `FileDescriptorProto` data into one TypeScript
//! type declaration per message and enum.
//!
//! ## Architecture
//!
//! Generation is driven by [`Generator`], which for every file:
//!
//! 1. Skips the well-known scalar wrapper messages
//! 2. Builds the map-entry [`AliasTable`] of each remaining message
//! 3. Renders the message declaration against that table
//! 4. Renders every top-level enum as a string-literal union
//!
//! A failure in any message aborts the whole pass; artifacts rendered so far
//! are dropped.

mod enums;
mod map_entry;
mod message;
mod types;
mod writer;

use crate::error::{Error, Result};
use crate::DEFAULT_FILE_SUFFIX;
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use tracing::{debug, trace};

pub use enums::render_enum;
pub use map_entry::{detect_map_entries, is_map_entry, AliasTable};
pub use message::render_message;
pub use types::{field_key, field_type, is_wrapper_message, wrapper_type, FieldKind};

/// Configuration for declaration generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Indentation string (default: 2 spaces)
    pub indent_str: String,
    /// Suffix appended to each artifact name (default: `.d.ts`)
    pub file_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent_str: "  ".to_string(),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Sets the artifact file suffix
    pub fn file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    /// Parses a protoc plugin parameter such as `suffix=.ts,indent=4`.
    ///
    /// An empty parameter yields the default configuration.
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let mut config = Self::default();

        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(Error::invalid_parameter(pair, "expected key=value"));
            };

            match key.trim() {
                "suffix" => {
                    let value = value.trim();
                    if value.is_empty() {
                        return Err(Error::invalid_parameter(pair, "suffix must not be empty"));
                    }
                    config.file_suffix = value.to_string();
                }
                "indent" => {
                    let width: usize = value.trim().parse().map_err(|_| {
                        Error::invalid_parameter(pair, "indent must be a number of spaces")
                    })?;
                    config.indent_str = " ".repeat(width);
                }
                other => {
                    return Err(Error::invalid_parameter(
                        pair,
                        format!("unknown key '{}'", other),
                    ))
                }
            }
        }

        Ok(config)
    }
}

/// One generated declaration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    name: String,
    content: String,
}

impl GeneratedArtifact {
    /// Creates a new artifact
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Artifact file name, e.g. `User.d.ts`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaration text
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl From<GeneratedArtifact> for File {
    fn from(artifact: GeneratedArtifact) -> Self {
        File {
            name: Some(artifact.name),
            content: Some(artifact.content),
            ..Default::default()
        }
    }
}

/// Counters collected over one generation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Number of files visited
    pub file_count: usize,
    /// Number of message declarations emitted
    pub message_count: usize,
    /// Number of enum declarations emitted
    pub enum_count: usize,
    /// Number of well-known wrapper messages skipped
    pub wrapper_count: usize,
    /// Number of map entries turned into aliases
    pub map_entry_count: usize,
}

/// Output of a successful generation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    /// Artifacts in traversal order
    pub artifacts: Vec<GeneratedArtifact>,
    /// Pass statistics
    pub stats: GenerationStats,
}

/// Converts descriptors into TypeScript declarations
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with a custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Decodes a serialized `FileDescriptorSet` and generates its declarations
    pub fn generate_from_bytes(&self, data: &[u8]) -> Result<Generation> {
        let set = FileDescriptorSet::decode(data)?;
        self.generate(&set.file)
    }

    /// Generates declarations for every message and enum of `files`.
    ///
    /// Files are visited in order; within a file all messages come before
    /// all enums.
    pub fn generate(&self, files: &[FileDescriptorProto]) -> Result<Generation> {
        let mut generation = Generation::default();

        for file in files {
            debug!(
                "Generating declarations for {} ({} messages, {} enums)",
                file.name(),
                file.message_type.len(),
                file.enum_type.len()
            );
            generation.stats.file_count += 1;

            for message in &file.message_type {
                if is_wrapper_message(file.package(), message.name()) {
                    trace!("Skipping well-known wrapper {}", message.name());
                    generation.stats.wrapper_count += 1;
                    continue;
                }

                let aliases = detect_map_entries(message)?;
                generation.stats.map_entry_count += aliases.len();

                let content = render_message(message, &aliases, &self.config.indent_str)?;
                generation.artifacts.push(self.artifact(message.name(), content));
                generation.stats.message_count += 1;
            }

            for enum_type in &file.enum_type {
                let content = render_enum(enum_type, &self.config.indent_str)?;
                generation.artifacts.push(self.artifact(enum_type.name(), content));
                generation.stats.enum_count += 1;
            }
        }

        Ok(generation)
    }

    fn artifact(&self, type_name: &str, content: String) -> GeneratedArtifact {
        let name = format!("{}{}", type_name, self.config.file_suffix);
        trace!("Emitting {}", name);
        GeneratedArtifact::new(name, content)
    }
}

/// Handles one protoc plugin invocation.
///
/// The configuration is read from the request parameter. Every file listed
/// in `proto_file` is converted, dependencies included, so wrapper fields
/// resolve even when `wrappers.proto` comes along in the request.
pub fn generate_response(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
    let config = GeneratorConfig::from_parameter(request.parameter())?;
    let generation = Generator::with_config(config).generate(&request.proto_file)?;

    debug!(
        "Generated {} messages and {} enums from {} files",
        generation.stats.message_count, generation.stats.enum_count, generation.stats.file_count
    );

    Ok(CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        file: generation.artifacts.into_iter().map(File::from).collect(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::map_entry::tests::map_entry;
    use super::types::tests::{reference, repeated, scalar};
    use super::*;
    use pretty_assertions::assert_eq;
    use prost_types::field_descriptor_proto::Type;
    use prost_types::{DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto};

    fn message(name: &str, fields: Vec<prost_types::FieldDescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            field: fields,
            ..Default::default()
        }
    }

    fn enum_of(name: &str, values: &[&str]) -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some(name.to_string()),
            value: values
                .iter()
                .map(|v| EnumValueDescriptorProto {
                    name: Some(v.to_string()),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn wrappers_file() -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("google/protobuf/wrappers.proto".to_string()),
            package: Some("google.protobuf".to_string()),
            message_type: ["DoubleValue", "Int64Value", "BoolValue", "StringValue"]
                .iter()
                .map(|n| message(n, vec![scalar("value", Type::Int64)]))
                .collect(),
            ..Default::default()
        }
    }

    fn app_file() -> FileDescriptorProto {
        let mut item = message(
            "Item",
            vec![
                scalar("id", Type::Int32),
                reference("count", Type::Message, ".google.protobuf.Int64Value"),
                repeated(reference("labels", Type::Message, ".app.Item.LabelsEntry")),
                reference("status", Type::Enum, ".app.Status"),
            ],
        );
        item.nested_type = vec![map_entry(
            "LabelsEntry",
            scalar("key", Type::String),
            scalar("value", Type::String),
        )];

        FileDescriptorProto {
            name: Some("app/item.proto".to_string()),
            package: Some("app".to_string()),
            message_type: vec![item, message("Empty", vec![])],
            enum_type: vec![enum_of("Status", &["UNKNOWN", "READY"])],
            ..Default::default()
        }
    }

    fn names(generation: &Generation) -> Vec<&str> {
        generation.artifacts.iter().map(|a| a.name()).collect()
    }

    #[test]
    fn test_traversal_order_and_wrapper_skip() {
        let generation = Generator::new()
            .generate(&[wrappers_file(), app_file()])
            .unwrap();

        assert_eq!(
            names(&generation),
            vec!["Item.d.ts", "Empty.d.ts", "Status.d.ts"]
        );
        assert_eq!(
            generation.stats,
            GenerationStats {
                file_count: 2,
                message_count: 2,
                enum_count: 1,
                wrapper_count: 4,
                map_entry_count: 1,
            }
        );
        assert_eq!(
            generation.artifacts[0].content(),
            "\
type Item = Readonly<{
  id: number;
  count: number | null;
  labels: Readonly<{ [key: string]: string; }>;
  status: Status;
}>;
"
        );
    }

    #[test]
    fn test_unsupported_nested_type_fails_whole_pass() {
        let mut bad = message("Outer", vec![]);
        bad.nested_type = vec![message("Inner", vec![scalar("a", Type::Bool)])];
        let bad_file = FileDescriptorProto {
            name: Some("bad.proto".to_string()),
            message_type: vec![bad],
            ..Default::default()
        };

        let err = Generator::new()
            .generate(&[app_file(), bad_file])
            .unwrap_err();
        assert!(err.is_schema_error());
        assert!(matches!(err, Error::UnsupportedNestedType { .. }));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let files = [wrappers_file(), app_file()];
        let first = Generator::new().generate(&files).unwrap();
        let second = Generator::new().generate(&files).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_from_bytes() {
        let set = FileDescriptorSet {
            file: vec![app_file()],
        };
        let generation = Generator::new()
            .generate_from_bytes(&set.encode_to_vec())
            .unwrap();
        assert_eq!(generation.artifacts.len(), 3);

        let err = Generator::new().generate_from_bytes(&[0xff, 0xff]).unwrap_err();
        assert!(matches!(err, Error::DescriptorDecode(_)));
    }

    #[test]
    fn test_config_from_parameter() {
        assert_eq!(
            GeneratorConfig::from_parameter("").unwrap(),
            GeneratorConfig::default()
        );

        let config = GeneratorConfig::from_parameter("suffix=.ts, indent=4").unwrap();
        assert_eq!(config.file_suffix, ".ts");
        assert_eq!(config.indent_str, "    ");

        assert!(GeneratorConfig::from_parameter("suffix=").is_err());
        assert!(GeneratorConfig::from_parameter("indent=two").is_err());
        assert!(GeneratorConfig::from_parameter("flavor=strict").is_err());
        assert!(GeneratorConfig::from_parameter("suffix").is_err());
    }

    #[test]
    fn test_custom_suffix() {
        let generator = Generator::with_config(GeneratorConfig::new().file_suffix(".ts"));
        let generation = generator.generate(&[app_file()]).unwrap();
        assert_eq!(names(&generation), vec!["Item.ts", "Empty.ts", "Status.ts"]);
    }

    #[test]
    fn test_generate_response() {
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["app/item.proto".to_string()],
            parameter: Some("indent=4".to_string()),
            proto_file: vec![wrappers_file(), app_file()],
            ..Default::default()
        };

        let response = generate_response(&request).unwrap();
        assert_eq!(response.error, None);
        assert_eq!(
            response.supported_features,
            Some(Feature::Proto3Optional as u64)
        );
        let files: Vec<_> = response.file.iter().map(|f| f.name()).collect();
        assert_eq!(files, vec!["Item.d.ts", "Empty.d.ts", "Status.d.ts"]);
        assert_eq!(
            response.file[2].content(),
            "type Status =\n    | 'UNKNOWN'\n    | 'READY';\n"
        );
    }

    #[test]
    fn test_generate_response_rejects_bad_parameter() {
        let request = CodeGeneratorRequest {
            parameter: Some("bogus".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            generate_response(&request),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
