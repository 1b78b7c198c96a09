//! # IronCSDL
//!
//! Generate serde-annotated Rust types from CSDL (OData/Redfish EDMX)
//! metadata.
//!
//! ## Pipeline
//!
//! Documents are parsed into raw per-namespace records, built into a type
//! model, folded so every type carries its inherited properties, and emitted
//! as one Rust module per vendor.
//!
//! ```ignore
//! use ironcsdl::prelude::*;
//!
//! let records = load_paths(&["schemas/"])?;
//! let (model, aliases) = build_model(&records)?;
//! let files = Generator::new(&model, &aliases)
//!     .with_config(GeneratorConfig::new().with_module_name("redfish"))
//!     .generate()?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Document loading and type model resolution
//! - [`codegen`] - Rust code generation
//! - [`cli`] - Command-line front end

pub mod cli;
pub mod prelude;

/// Document loading and type model resolution.
pub mod schema {
    pub use ironcsdl_schema::*;
}

/// Rust code generation from the folded type model.
pub mod codegen {
    pub use ironcsdl_codegen::*;
}

pub use ironcsdl_codegen::{
    CodegenError, GeneratedFile, Generator, GeneratorConfig, build_model, generate_from_files,
    generate_from_xml,
};
pub use ironcsdl_schema::{ParseError, SchemaError, TypeModel, load_paths};
