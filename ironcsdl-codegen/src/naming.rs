//! Rust identifier naming.

use ironcsdl_schema::Type;
use ironcsdl_schema::version::vendor_of;

/// Rust keywords usable as raw identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "Self", "super", "_"];

/// Converts a PascalCase or camelCase name to snake_case.
///
/// Runs of capitals are kept together: `PCIeDevices` becomes `pc_ie_devices`
/// and `UUID` becomes `uuid`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() && c != '_' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_lower);
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '.' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Escapes a name that collides with a Rust keyword.
#[must_use]
pub fn escape_keyword(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Returns the field identifier for a property name.
#[must_use]
pub fn field_name(property: &str) -> String {
    let mut name = to_snake_case(property);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    escape_keyword(&name)
}

/// Strips a raw identifier prefix.
#[must_use]
pub fn unraw(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// Returns the Rust type name of a model type.
///
/// The name is the vendor prefix followed by the type name, unless the
/// namespace already starts with the type name: `Chassis.v1_0_0.Chassis` is
/// `Chassis` while `Chassis.v1_0_0.Links` is `ChassisLinks`.
#[must_use]
pub fn type_name(ty: &Type) -> String {
    let name = if ty.namespace.starts_with(&ty.name) {
        to_pascal_case(&ty.name)
    } else {
        to_pascal_case(&format!("{}{}", vendor_of(&ty.namespace), ty.name))
    };
    if RESERVED.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Returns the module name for an output group.
#[must_use]
pub fn module_name(group: &str) -> String {
    escape_keyword(&to_snake_case(group))
}
