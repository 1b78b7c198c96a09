//! # IronCSDL Schema
//!
//! CSDL (OData/Redfish EDMX) document loader and type model resolution.
//!
//! This crate provides:
//! - XML document parsing into raw per-namespace records
//! - Type model construction with an explicit alias table
//! - Namespace version ordering
//! - Inheritance folding across namespace versions
//! - Property type resolution with version-insensitive fallback

pub mod builder;
pub mod error;
pub mod fold;
pub mod loader;
pub mod model;
pub mod parser;
pub mod records;
pub mod resolve;
pub mod types;
pub mod version;

pub use error::{ParseError, SchemaError};
pub use fold::{FoldReport, fold_model, fold_type};
pub use loader::{collect_documents, load_paths};
pub use model::{AliasTable, FoldStatus, TypeModel};
pub use parser::{parse_document, parse_document_file};
pub use records::{
    Annotation, AnnotationValue, ComplexTypeDecl, Document, EntityTypeDecl, EnumMemberDecl,
    EnumTypeDecl, NavigationPropertyDecl, PropertyDecl, RecordSet, SchemaRecords,
    TypeDefinitionDecl,
};
pub use resolve::{Primitive, Resolver, SharedShape, Target, TypeRef};
pub use types::{EnumMember, PropertyType, Type};
pub use version::{NamespaceVersion, compare_qualified};
