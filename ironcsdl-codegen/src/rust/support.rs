//! OData runtime support module generation.

/// File name of the support module.
pub const SUPPORT_MODULE: &str = "odata";

const SUPPORT_TYPES: &str = r#"/// Open-ended JSON object.
pub type OpenMap = BTreeMap<String, serde_json::Value>;

/// RFC 3339 timestamp with offset.
pub type DateTimeOffset = String;

/// ISO 8601 calendar date.
pub type Date = String;

/// ISO 8601 duration, e.g. `P1DT2H`.
pub type Duration = String;

/// UUID in its canonical textual form.
pub type Uuid = String;

/// Reference to another resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OdataId {
    /// Resource URI.
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

impl OdataId {
    /// Creates a reference to the given URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            odata_id: uri.into(),
        }
    }
}

/// Invocable action advertised by a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action target URI.
    pub target: String,
    /// URI of the action parameter description.
    #[serde(
        rename = "@Redfish.ActionInfo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub action_info: Option<String>,
}
"#;

/// Generator for the support types shared by every generated module.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportGenerator;

impl SupportGenerator {
    /// Creates a new support generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generates the support module body, including its imports.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        output.push_str("use serde::{Deserialize, Serialize};\n");
        output.push_str("use std::collections::BTreeMap;\n\n");
        output.push_str(SUPPORT_TYPES);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_types_present() {
        let code = SupportGenerator::new().generate();
        for name in [
            "pub type OpenMap",
            "pub type DateTimeOffset",
            "pub type Date ",
            "pub type Duration",
            "pub type Uuid",
            "pub struct OdataId",
            "pub struct Action",
        ] {
            assert!(code.contains(name), "missing {name}");
        }
        assert!(code.contains("#[serde(rename = \"@odata.id\")]"));
    }
}
