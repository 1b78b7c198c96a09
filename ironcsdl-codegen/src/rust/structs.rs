//! Struct code generation.

use crate::plan::{FieldDecl, StructDecl};

/// Generator for struct declarations.
pub struct StructGenerator<'a> {
    decl: &'a StructDecl,
}

impl<'a> StructGenerator<'a> {
    /// Creates a new struct generator.
    #[must_use]
    pub fn new(decl: &'a StructDecl) -> Self {
        Self { decl }
    }

    /// Generates the struct definition.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("/// `{}`.\n", self.decl.qualified_name));
        output.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
        output.push_str(&format!("pub struct {} {{\n", self.decl.name));
        for field in &self.decl.fields {
            output.push_str(&generate_field(field));
        }
        output.push_str("}\n\n");

        output
    }
}

/// Generates one field with its serde attribute.
fn generate_field(field: &FieldDecl) -> String {
    let mut output = String::new();
    let mut serde = Vec::new();

    if field.needs_rename() {
        serde.push(format!("rename = \"{}\"", field.json_name));
    }
    if let Some(predicate) = field.skip_predicate() {
        serde.push("default".to_string());
        serde.push(format!("skip_serializing_if = \"{predicate}\""));
    }
    if !serde.is_empty() {
        output.push_str(&format!("    #[serde({})]\n", serde.join(", ")));
    }
    output.push_str(&format!("    pub {}: {},\n", field.name, field.rust_type()));
    output
}
