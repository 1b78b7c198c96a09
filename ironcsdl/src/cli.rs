//! Command-line front end.

use crate::{GeneratorConfig, build_model};
use anyhow::{Context, Result, bail};
use clap::Parser;
use ironcsdl_codegen::Generator;
use ironcsdl_schema::load_paths;
use std::path::PathBuf;

/// Generate serde-annotated Rust types from CSDL metadata
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "ironcsdl")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// CSDL documents, `.zip` archives of them, or directories searched for `.xml` files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Name of the generated module
    #[arg(short, long, default_value = "standard")]
    pub module_name: String,

    /// Emit everything into a single `<module-name>.rs`
    #[arg(long)]
    pub single_file: bool,

    /// Skip collection resources
    #[arg(long)]
    pub ignore_collections: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns the generator configuration selected by the flags.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_module_name(self.module_name.clone())
            .with_single_file(self.single_file)
            .with_ignore_collections(self.ignore_collections)
    }

    /// Returns the default log filter directive.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Runs the generator.
///
/// # Returns
/// Paths of the written files.
///
/// # Errors
/// Returns an error naming the offending document or output path.
pub fn run(args: &Args) -> Result<Vec<PathBuf>> {
    let records = load_paths(&args.inputs).context("failed to load input documents")?;
    if records.is_empty() {
        bail!("no schemas found in the given inputs");
    }
    tracing::info!("loaded {} namespaces", records.len());

    let (model, aliases) = build_model(&records).context("failed to resolve type model")?;
    let written = Generator::new(&model, &aliases)
        .with_config(args.generator_config())
        .write_to(&args.out_dir)
        .with_context(|| format!("failed to generate into {}", args.out_dir.display()))?;

    tracing::info!(
        "wrote {} files to {}",
        written.len(),
        args.out_dir.display()
    );
    Ok(written)
}
