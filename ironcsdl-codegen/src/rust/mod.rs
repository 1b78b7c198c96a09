//! Rust code generation modules.

pub mod enums;
pub mod structs;
pub mod support;

pub use enums::EnumGenerator;
pub use structs::StructGenerator;
pub use support::{SUPPORT_MODULE, SupportGenerator};

use crate::plan::TypeDecl;

/// Imports at the top of every group module.
const MODULE_PRELUDE: &str = "#![allow(unused_imports)]\n\n\
use super::*;\n\
use serde::{Deserialize, Serialize};\n\
use std::collections::BTreeMap;\n\n";

/// Generator for one output module holding a group's declarations.
pub struct ModuleGenerator<'a> {
    group: &'a str,
    decls: &'a [TypeDecl],
}

impl<'a> ModuleGenerator<'a> {
    /// Creates a new module generator.
    #[must_use]
    pub fn new(group: &'a str, decls: &'a [TypeDecl]) -> Self {
        Self { group, decls }
    }

    /// Generates the module file contents.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("//! `{}` schema types.\n\n", self.group));
        output.push_str(MODULE_PRELUDE);
        output.push_str(&self.generate_declarations());
        output
    }

    /// Generates the declarations without module header or imports.
    #[must_use]
    pub fn generate_declarations(&self) -> String {
        let mut output = String::new();
        for decl in self.decls {
            match decl {
                TypeDecl::Struct(s) => output.push_str(&StructGenerator::new(s).generate()),
                TypeDecl::Enum(e) => output.push_str(&EnumGenerator::new(e).generate()),
                TypeDecl::Empty => {}
            }
        }
        output
    }
}

/// Generates the header shared by `mod.rs` and single-file output.
#[must_use]
pub fn generate_header(module_name: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("//! `{module_name}` CSDL bindings.\n"));
    output.push_str("//!\n");
    output.push_str("//! Generated by ironcsdl. Do not edit.\n\n");
    output
}

/// Generates `mod.rs` declaring and re-exporting every module.
#[must_use]
pub fn generate_mod_rs(module_name: &str, modules: &[String]) -> String {
    let mut output = generate_header(module_name);
    for module in modules {
        output.push_str(&format!("pub mod {module};\n"));
    }
    output.push('\n');
    for module in modules {
        output.push_str(&format!("pub use {module}::*;\n"));
    }
    output
}

/// Generates a single file holding the support types and every group as an
/// inline module.
#[must_use]
pub fn generate_single_file(module_name: &str, groups: &[(String, Vec<TypeDecl>)]) -> String {
    let mut output = generate_header(module_name);
    output.push_str(&SupportGenerator::new().generate());
    output.push('\n');

    for (module, decls) in groups {
        output.push_str(&format!("pub mod {module} {{\n"));
        let body = format!(
            "{MODULE_PRELUDE}{}",
            ModuleGenerator::new(module, decls).generate_declarations()
        );
        output.push_str(&indent(body.trim_end()));
        output.push_str("\n}\n\n");
        output.push_str(&format!("pub use {module}::*;\n\n"));
    }
    output
}

fn indent(code: &str) -> String {
    code.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{EnumDecl, VariantDecl};

    fn decls() -> Vec<TypeDecl> {
        vec![
            TypeDecl::Enum(EnumDecl {
                name: "WidgetColor".to_string(),
                qualified_name: "Widget.v1_0_0.Color".to_string(),
                members: vec![VariantDecl {
                    name: "Red".to_string(),
                    json_name: "Red".to_string(),
                    value: None,
                }],
            }),
            TypeDecl::Empty,
        ]
    }

    #[test]
    fn test_module_file() {
        let decls = decls();
        let code = ModuleGenerator::new("Widget", &decls).generate();
        assert!(code.starts_with("//! `Widget` schema types.\n"));
        assert!(code.contains("use super::*;\n"));
        assert!(code.contains("pub enum WidgetColor {"));
    }

    #[test]
    fn test_mod_rs() {
        let code = generate_mod_rs("standard", &["odata".to_string(), "widget".to_string()]);
        assert!(code.starts_with("//! `standard` CSDL bindings.\n"));
        assert!(code.contains("pub mod odata;\npub mod widget;\n"));
        assert!(code.contains("pub use odata::*;\npub use widget::*;\n"));
    }

    #[test]
    fn test_single_file() {
        let code = generate_single_file("standard", &[("widget".to_string(), decls())]);
        assert!(code.contains("pub struct OdataId"));
        assert!(code.contains("pub mod widget {\n    #![allow(unused_imports)]\n"));
        assert!(code.contains("    pub enum WidgetColor {\n"));
        assert!(code.contains("pub use widget::*;"));
    }
}
