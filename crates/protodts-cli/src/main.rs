//! protoc-gen-dts - Generate TypeScript declarations from Protocol Buffer descriptors
//!
//! Invoked without input flags, this binary behaves as a `protoc` plugin:
//! it reads a `CodeGeneratorRequest` from stdin and writes the matching
//! `CodeGeneratorResponse` to stdout. With `--descriptor-set` it reads a
//! `FileDescriptorSet` (`protoc -o`) and writes the declarations to disk.

use anyhow::{bail, Context, Result};
use clap::Parser;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use protodts_core::{Error, GeneratedArtifact, Generator, GeneratorConfig};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, trace, Level};
use tracing_subscriber::EnvFilter;

/// Generate TypeScript declarations from Protocol Buffer descriptors
#[derive(Parser, Debug)]
#[command(name = "protoc-gen-dts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a FileDescriptorSet produced by `protoc -o` (plugin mode if absent)
    #[arg(long)]
    descriptor_set: Option<PathBuf>,

    /// Output directory for generated declaration files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suffix appended to every generated file name
    #[arg(long, default_value = protodts_core::DEFAULT_FILE_SUFFIX)]
    suffix: String,

    /// Indentation width in spaces
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Overwrite existing files
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the plugin response
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.descriptor_set {
        Some(ref set) => process_descriptor_set(&cli, set),
        None => run_plugin(),
    }
}

/// Serve one protoc plugin request over stdin/stdout
fn run_plugin() -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read CodeGeneratorRequest from stdin")?;

    let request = CodeGeneratorRequest::decode(input.as_slice())
        .context("Failed to decode CodeGeneratorRequest")?;

    debug!(
        "Plugin request: {} proto files, {} to generate, parameter '{}'",
        request.proto_file.len(),
        request.file_to_generate.len(),
        request.parameter()
    );

    let response =
        protodts_core::generate_response(&request).context("Failed to generate declarations")?;

    let output = response.encode_to_vec();
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&output)
        .context("Failed to write CodeGeneratorResponse to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn generator_for(cli: &Cli) -> Generator {
    Generator::with_config(
        GeneratorConfig::new()
            .indent_str(" ".repeat(cli.indent))
            .file_suffix(cli.suffix.as_str()),
    )
}

/// Generate and write the declarations of one descriptor set.
///
/// Every check runs before the first file is written: a generation
/// failure, a duplicate artifact name or an existing file leaves the
/// output directory untouched.
fn process_descriptor_set(cli: &Cli, set_path: &Path) -> Result<()> {
    if !set_path.is_file() {
        bail!("Descriptor set is not a file: {}", set_path.display());
    }

    trace!("Reading {}", set_path.display());
    let data = fs::read(set_path).map_err(|e| Error::file_read(set_path, e))?;

    let generation = generator_for(cli)
        .generate_from_bytes(&data)
        .with_context(|| format!("Failed to generate declarations for {}", set_path.display()))?;

    debug!(
        "{}: {} messages, {} enums, {} wrappers skipped",
        set_path.display(),
        generation.stats.message_count,
        generation.stats.enum_count,
        generation.stats.wrapper_count
    );

    let targets = plan_outputs(&cli.output, &generation.artifacts, cli.force)?;
    for (artifact, path) in generation.artifacts.iter().zip(&targets) {
        write_declaration_file(path, artifact.content())?;
        println!("Wrote {}", path.display());
    }

    info!("Wrote {} declaration files", targets.len());
    Ok(())
}

/// Resolve the output path of every artifact, in traversal order.
///
/// Two types with the same short name map to the same file; that is
/// reported rather than renamed.
fn plan_outputs(
    output_dir: &Path,
    artifacts: &[GeneratedArtifact],
    force: bool,
) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        if !seen.insert(artifact.name()) {
            bail!(
                "Duplicate declaration name: {} (types from different packages share a name)",
                artifact.name()
            );
        }

        let path = safe_output_path(output_dir, artifact.name())?;
        if path.exists() && !force {
            bail!(
                "File already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        targets.push(path);
    }

    Ok(targets)
}

/// Resolve an artifact name under the output directory, refusing names
/// that would leave it
fn safe_output_path(output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let relative = Path::new(file_name);
    let mut components = relative.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(output_dir.join(relative)),
        _ => Err(Error::path_traversal(relative).into()),
    }
}

/// Write a declaration file to disk
fn write_declaration_file(output_path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;
    }

    let mut file =
        fs::File::create(output_path).map_err(|e| Error::file_write(output_path, e))?;

    file.write_all(content.as_bytes())
        .map_err(|e| Error::file_write(output_path, e))?;

    Ok(())
}
