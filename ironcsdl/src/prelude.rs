//! Prelude module for convenient imports.
//!
//! ```ignore
//! use ironcsdl::prelude::*;
//! ```

// Schema types
pub use ironcsdl_schema::{
    AliasTable, FoldReport, FoldStatus, ParseError, PropertyType, RecordSet, Resolver,
    SchemaError, Target, Type, TypeModel, TypeRef, fold_model, load_paths, parse_document,
};

// Codegen types
pub use ironcsdl_codegen::{
    CodegenError, GeneratedFile, Generator, GeneratorConfig, TypeDecl, build_model, plan_type,
};
