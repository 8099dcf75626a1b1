//! # protodts-core
//!
//! A library for converting Protocol Buffer descriptors into TypeScript type declarations.
//!
//! This crate provides the core functionality for:
//! - Mapping protobuf field types onto TypeScript type expressions
//! - Encoding oneof groups as mutually exclusive discriminated unions
//! - Aliasing synthetic map-entry messages as keyed record types
//! - Rendering enums as string-literal unions
//!
//! ## Architecture
//!
//! The library is organized into two modules:
//!
//! - [`codegen`]: Descriptor-to-declaration conversion
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use protodts_core::Generator;
//! use std::fs;
//!
//! // Read a descriptor set produced by `protoc -o`
//! let data = fs::read("./schema.pb")?;
//!
//! let generation = Generator::new().generate_from_bytes(&data)?;
//! for artifact in &generation.artifacts {
//!     println!("// {}\n{}", artifact.name(), artifact.content());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! When running as a `protoc` plugin, [`generate_response`] turns a
//! `CodeGeneratorRequest` into the matching `CodeGeneratorResponse`.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod codegen;
pub mod error;

// Re-export primary types for convenience
pub use codegen::{
    generate_response, AliasTable, FieldKind, GeneratedArtifact, Generation, GenerationStats,
    Generator, GeneratorConfig,
};
pub use error::{Error, Result};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default suffix appended to every artifact name
pub const DEFAULT_FILE_SUFFIX: &str = ".d.ts";
