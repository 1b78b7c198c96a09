//! Enum code generation.

use crate::plan::EnumDecl;

/// Generator for enumeration declarations.
pub struct EnumGenerator<'a> {
    decl: &'a EnumDecl,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(decl: &'a EnumDecl) -> Self {
        Self { decl }
    }

    /// Generates the enum definition.
    ///
    /// Members serialize by name. Integer values become discriminants when
    /// every member declares one.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let discriminants = self.decl.discriminants();

        output.push_str(&format!("/// `{}`.\n", self.decl.qualified_name));
        output.push_str(
            "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\n",
        );
        if discriminants.is_some() {
            output.push_str("#[repr(i64)]\n");
        }
        output.push_str(&format!("pub enum {} {{\n", self.decl.name));

        for (i, member) in self.decl.members.iter().enumerate() {
            if member.name != member.json_name {
                output.push_str(&format!("    #[serde(rename = \"{}\")]\n", member.json_name));
            }
            match discriminants.as_ref().and_then(|d| d.get(i)) {
                Some(value) => output.push_str(&format!("    {} = {},\n", member.name, value)),
                None => output.push_str(&format!("    {},\n", member.name)),
            }
        }

        output.push_str("}\n\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::VariantDecl;

    fn variant(name: &str, json: &str, value: Option<i64>) -> VariantDecl {
        VariantDecl {
            name: name.to_string(),
            json_name: json.to_string(),
            value,
        }
    }

    #[test]
    fn test_generate_named_enum() {
        let decl = EnumDecl {
            name: "ResourcePowerState".to_string(),
            qualified_name: "Resource.PowerState".to_string(),
            members: vec![
                variant("On", "On", None),
                variant("AuxPower", "Aux_Power", Some(3)),
            ],
        };

        let code = EnumGenerator::new(&decl).generate();

        assert!(code.contains("pub enum ResourcePowerState {"));
        assert!(code.contains("    On,\n"));
        assert!(code.contains("    #[serde(rename = \"Aux_Power\")]\n    AuxPower,\n"));
        assert!(!code.contains("#[repr(i64)]"));
    }

    #[test]
    fn test_generate_valued_enum() {
        let decl = EnumDecl {
            name: "WidgetLevel".to_string(),
            qualified_name: "Widget.Level".to_string(),
            members: vec![variant("Low", "Low", Some(1)), variant("High", "High", Some(4))],
        };

        let code = EnumGenerator::new(&decl).generate();

        assert!(code.contains("#[repr(i64)]\npub enum WidgetLevel {"));
        assert!(code.contains("    Low = 1,\n    High = 4,\n"));
    }
}
