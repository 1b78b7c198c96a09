//! # IronCSDL Codegen
//!
//! Rust code generation from CSDL metadata.
//!
//! This crate provides:
//! - Declaration planning from the folded type model
//! - Duplicate reconciliation across namespace versions
//! - Serde-annotated struct and enum generation
//! - OData support type generation

pub mod error;
pub mod generator;
pub mod grouping;
pub mod naming;
pub mod plan;
pub mod rust;

pub use error::CodegenError;
pub use generator::{GeneratedFile, Generator, GeneratorConfig};
pub use grouping::FileGroup;
pub use plan::{TypeDecl, plan_type};

use ironcsdl_schema::{AliasTable, RecordSet, TypeModel};
use std::path::Path;

/// Builds and folds the type model of a record set.
///
/// # Errors
/// Returns `CodegenError` if a base chain loops.
pub fn build_model(records: &RecordSet) -> Result<(TypeModel, AliasTable), CodegenError> {
    let (mut model, aliases) = TypeModel::build(records);
    let report = ironcsdl_schema::fold_model(&mut model, &aliases)?;
    if !report.is_clean() {
        tracing::info!(
            "dropped {} types with unresolvable base types",
            report.deleted.len()
        );
    }
    Ok((model, aliases))
}

/// Generates Rust code from a single CSDL document string.
///
/// # Arguments
/// * `xml` - EDMX document content
///
/// # Returns
/// Generated Rust code as a single module.
///
/// # Errors
/// Returns `CodegenError` if parsing, folding or generation fails.
pub fn generate_from_xml(xml: &str) -> Result<String, CodegenError> {
    let mut records = RecordSet::new();
    records.add_document(ironcsdl_schema::parse_document(xml)?);
    let (model, aliases) = build_model(&records)?;
    let config = GeneratorConfig::new().with_single_file(true);
    let files = Generator::new(&model, &aliases).with_config(config).generate()?;
    files
        .into_iter()
        .next()
        .map(|f| f.contents)
        .ok_or_else(|| CodegenError::generation("no output produced"))
}

/// Generates Rust code from CSDL files and directories.
///
/// # Arguments
/// * `inputs` - Document files, `.zip` archives, or directories walked for `.xml` files
/// * `config` - Generator configuration
///
/// # Returns
/// Generated files, relative to the output directory.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, folding or generation fails.
pub fn generate_from_files<P: AsRef<Path>>(
    inputs: &[P],
    config: GeneratorConfig,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    let records = ironcsdl_schema::load_paths(inputs)?;
    let (model, aliases) = build_model(&records)?;
    Generator::new(&model, &aliases).with_config(config).generate()
}
