//! CSDL (EDMX) document parser.
//!
//! This module reads OData CSDL XML documents into raw [`Document`] records.
//! Only the declarations needed to build the type model are captured; actions,
//! functions, terms, entity containers and references are skipped as opaque
//! subtrees.

use crate::error::ParseError;
use crate::records::{
    Annotation, AnnotationValue, ComplexTypeDecl, Document, EntityTypeDecl, EnumMemberDecl,
    EnumTypeDecl, NavigationPropertyDecl, PropertyDecl, SchemaRecords, TypeDefinitionDecl,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Parses a CSDL document from a string.
///
/// # Arguments
/// * `xml` - EDMX document content
///
/// # Returns
/// Parsed document or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, has no `Edmx` root, or a
/// declaration is missing a required attribute.
pub fn parse_document(xml: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document: Option<Document> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let e = e.into_owned();
                match local_name(&e)? {
                    "Edmx" => document = Some(parse_edmx(&e)?),
                    "DataServices" if document.is_some() => {}
                    "Schema" => {
                        let doc = document.as_mut().ok_or_else(|| {
                            ParseError::invalid_structure("Schema element outside of Edmx")
                        })?;
                        doc.schemas.push(parse_schema(&mut reader, &e, false)?);
                    }
                    // Reference, IncludeAnnotations and anything unknown.
                    _ => skip_to_end(&mut reader)?,
                }
            }
            Event::Empty(e) => {
                let e = e.into_owned();
                match local_name(&e)? {
                    "Edmx" => document = Some(parse_edmx(&e)?),
                    "Schema" => {
                        let doc = document.as_mut().ok_or_else(|| {
                            ParseError::invalid_structure("Schema element outside of Edmx")
                        })?;
                        doc.schemas.push(parse_schema(&mut reader, &e, true)?);
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    document.ok_or_else(|| ParseError::invalid_structure("no Edmx element found"))
}

/// Reads and parses a CSDL document from a file.
///
/// Errors are wrapped with the file stem so the offending document is named.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or parsed.
pub fn parse_document_file(path: &Path) -> Result<Document, ParseError> {
    let name = document_name(path);
    let xml = std::fs::read_to_string(path).map_err(|e| ParseError::from(e).in_document(&name))?;
    parse_document(&xml).map_err(|e| e.in_document(name))
}

/// Returns the document name used in diagnostics: the file stem.
#[must_use]
pub fn document_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

/// Parses the Edmx root element attributes.
fn parse_edmx(e: &BytesStart<'_>) -> Result<Document, ParseError> {
    let mut document = Document::default();
    for attr in e.attributes() {
        let attr = attr?;
        let local = attr.key.local_name();
        let key = std::str::from_utf8(local.as_ref())?;
        if key == "Version" {
            document.version = Some(std::str::from_utf8(&attr.value)?.to_string());
        }
    }
    Ok(document)
}

/// Parses a Schema element.
fn parse_schema(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<SchemaRecords, ParseError> {
    let mut namespace = None;
    let mut alias = None;

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "Namespace" => namespace = Some(value.to_string()),
            "Alias" => alias = Some(value.to_string()),
            _ => {}
        }
    }

    let namespace = namespace.ok_or_else(|| ParseError::missing_attr("Schema", "Namespace"))?;
    let mut schema = SchemaRecords::new(namespace);
    schema.alias = alias;

    if empty {
        return Ok(schema);
    }

    for_each_child(reader, |reader, child, empty| {
        match local_name(child)? {
            "EntityType" => {
                let decl = parse_entity_type(reader, child, empty)?;
                schema.entity_types.push(decl);
            }
            "ComplexType" => {
                let decl = parse_complex_type(reader, child, empty)?;
                schema.complex_types.push(decl);
            }
            "EnumType" => {
                let decl = parse_enum_type(reader, child, empty)?;
                schema.enum_types.push(decl);
            }
            "TypeDefinition" => {
                let decl = parse_type_definition(child)?;
                schema.type_definitions.push(decl);
                if !empty {
                    skip_to_end(reader)?;
                }
            }
            // Action, Function, Term, EntityContainer, Annotations, ...
            _ if !empty => skip_to_end(reader)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(schema)
}

/// Parses an EntityType element.
fn parse_entity_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<EntityTypeDecl, ParseError> {
    let mut decl = EntityTypeDecl::default();
    let mut name = None;

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "Name" => name = Some(value.to_string()),
            "BaseType" => decl.base_type = Some(value.to_string()),
            "Abstract" => decl.is_abstract = parse_bool("EntityType", key, value)?,
            "OpenType" => decl.open_type = parse_bool("EntityType", key, value)?,
            "HasStream" => decl.has_stream = parse_bool("EntityType", key, value)?,
            _ => {}
        }
    }
    decl.name = name.ok_or_else(|| ParseError::missing_attr("EntityType", "Name"))?;

    if empty {
        return Ok(decl);
    }

    for_each_child(reader, |reader, child, empty| {
        match local_name(child)? {
            "Key" if !empty => {
                for_each_child(reader, |reader, key_child, empty| {
                    if local_name(key_child)? == "PropertyRef" {
                        if let Some(name) = attribute(key_child, "Name")? {
                            decl.key.push(name);
                        }
                    }
                    if !empty {
                        skip_to_end(reader)?;
                    }
                    Ok(())
                })?;
            }
            "Property" => decl.properties.push(parse_property(reader, child, empty)?),
            "NavigationProperty" => decl
                .navigation_properties
                .push(parse_navigation_property(reader, child, empty)?),
            "Annotation" => decl.annotations.push(parse_annotation(reader, child, empty)?),
            _ if !empty => skip_to_end(reader)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(decl)
}

/// Parses a ComplexType element.
fn parse_complex_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<ComplexTypeDecl, ParseError> {
    let mut decl = ComplexTypeDecl::default();
    let mut name = None;

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "Name" => name = Some(value.to_string()),
            "BaseType" => decl.base_type = Some(value.to_string()),
            "Abstract" => decl.is_abstract = parse_bool("ComplexType", key, value)?,
            "OpenType" => decl.open_type = parse_bool("ComplexType", key, value)?,
            _ => {}
        }
    }
    decl.name = name.ok_or_else(|| ParseError::missing_attr("ComplexType", "Name"))?;

    if empty {
        return Ok(decl);
    }

    for_each_child(reader, |reader, child, empty| {
        match local_name(child)? {
            "Property" => decl.properties.push(parse_property(reader, child, empty)?),
            "NavigationProperty" => decl
                .navigation_properties
                .push(parse_navigation_property(reader, child, empty)?),
            "Annotation" => decl.annotations.push(parse_annotation(reader, child, empty)?),
            _ if !empty => skip_to_end(reader)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(decl)
}

/// Parses a Property element.
fn parse_property(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<PropertyDecl, ParseError> {
    let mut name = None;
    let mut type_name = None;
    let mut nullable = None;

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "Name" => name = Some(value.to_string()),
            "Type" => type_name = Some(value.to_string()),
            "Nullable" => nullable = Some(parse_bool("Property", key, value)?),
            _ => {}
        }
    }

    let mut decl = PropertyDecl {
        name: name.ok_or_else(|| ParseError::missing_attr("Property", "Name"))?,
        type_name: type_name.ok_or_else(|| ParseError::missing_attr("Property", "Type"))?,
        nullable,
        annotations: Vec::new(),
    };

    if !empty {
        decl.annotations = parse_annotations_only(reader)?;
    }

    Ok(decl)
}

/// Parses a NavigationProperty element.
fn parse_navigation_property(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<NavigationPropertyDecl, ParseError> {
    let mut decl = NavigationPropertyDecl::default();
    let mut name = None;
    let mut type_name = None;

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "Name" => name = Some(value.to_string()),
            "Type" => type_name = Some(value.to_string()),
            "Nullable" => decl.nullable = Some(parse_bool("NavigationProperty", key, value)?),
            "Partner" => decl.partner = Some(value.to_string()),
            "ContainsTarget" => {
                decl.contains_target = parse_bool("NavigationProperty", key, value)?;
            }
            _ => {}
        }
    }

    decl.name = name.ok_or_else(|| ParseError::missing_attr("NavigationProperty", "Name"))?;
    decl.type_name =
        type_name.ok_or_else(|| ParseError::missing_attr("NavigationProperty", "Type"))?;

    if !empty {
        decl.annotations = parse_annotations_only(reader)?;
    }

    Ok(decl)
}

/// Parses an EnumType element.
fn parse_enum_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<EnumTypeDecl, ParseError> {
    let mut decl = EnumTypeDecl::default();
    let mut name = None;

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "Name" => name = Some(value.to_string()),
            "UnderlyingType" => decl.underlying_type = Some(value.to_string()),
            "IsFlags" => decl.is_flags = parse_bool("EnumType", key, value)?,
            _ => {}
        }
    }
    decl.name = name.ok_or_else(|| ParseError::missing_attr("EnumType", "Name"))?;

    if empty {
        return Ok(decl);
    }

    for_each_child(reader, |reader, child, empty| {
        match local_name(child)? {
            "Member" => {
                let member = EnumMemberDecl {
                    name: attribute(child, "Name")?
                        .ok_or_else(|| ParseError::missing_attr("Member", "Name"))?,
                    value: attribute(child, "Value")?,
                };
                decl.members.push(member);
                if !empty {
                    skip_to_end(reader)?;
                }
            }
            "Annotation" => decl.annotations.push(parse_annotation(reader, child, empty)?),
            _ if !empty => skip_to_end(reader)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(decl)
}

/// Parses a TypeDefinition element's attributes.
fn parse_type_definition(e: &BytesStart<'_>) -> Result<TypeDefinitionDecl, ParseError> {
    let name = attribute(e, "Name")?
        .ok_or_else(|| ParseError::missing_attr("TypeDefinition", "Name"))?;
    let underlying_type = attribute(e, "UnderlyingType")?
        .ok_or_else(|| ParseError::missing_attr("TypeDefinition", "UnderlyingType"))?;

    Ok(TypeDefinitionDecl {
        name,
        underlying_type,
    })
}

/// Parses an Annotation element with an inline literal value.
fn parse_annotation(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<Annotation, ParseError> {
    let mut term = None;
    let mut qualifier = None;
    let mut value = AnnotationValue::None;

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let raw = std::str::from_utf8(&attr.value)?;

        match key {
            "Term" => term = Some(raw.to_string()),
            "Qualifier" => qualifier = Some(raw.to_string()),
            "String" => value = AnnotationValue::String(raw.to_string()),
            "Bool" => value = AnnotationValue::Bool(parse_bool("Annotation", key, raw)?),
            "Int" => {
                value = AnnotationValue::Int(
                    raw.parse()
                        .map_err(|_| ParseError::invalid_attr("Annotation", key, raw))?,
                );
            }
            "Decimal" => {
                value = AnnotationValue::Decimal(
                    raw.parse()
                        .map_err(|_| ParseError::invalid_attr("Annotation", key, raw))?,
                );
            }
            "EnumMember" => value = AnnotationValue::EnumMember(raw.to_string()),
            _ => {}
        }
    }

    // Collection and Record expressions are not needed by the type model.
    if !empty {
        skip_to_end(reader)?;
    }

    Ok(Annotation {
        term: term.ok_or_else(|| ParseError::missing_attr("Annotation", "Term"))?,
        qualifier,
        value,
    })
}

/// Collects the Annotation children of the current element, skipping the rest.
fn parse_annotations_only(reader: &mut Reader<&[u8]>) -> Result<Vec<Annotation>, ParseError> {
    let mut annotations = Vec::new();
    for_each_child(reader, |reader, child, empty| {
        if local_name(child)? == "Annotation" {
            annotations.push(parse_annotation(reader, child, empty)?);
        } else if !empty {
            skip_to_end(reader)?;
        }
        Ok(())
    })?;
    Ok(annotations)
}

/// Calls `f` for every direct child element until the parent's end tag.
///
/// The callback receives the child start tag and whether it is an empty
/// element; for non-empty children it must consume up to the child's end tag.
fn for_each_child<F>(reader: &mut Reader<&[u8]>, mut f: F) -> Result<(), ParseError>
where
    F: FnMut(&mut Reader<&[u8]>, &BytesStart<'_>, bool) -> Result<(), ParseError>,
{
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let e = e.into_owned();
                f(reader, &e, false)?;
            }
            Event::Empty(e) => {
                let e = e.into_owned();
                f(reader, &e, true)?;
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(ParseError::invalid_structure(
                    "unexpected end of document inside an element",
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => {
                return Err(ParseError::invalid_structure(
                    "unexpected end of document inside an element",
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Returns the element name without its namespace prefix.
fn local_name<'a>(e: &'a BytesStart<'_>) -> Result<&'a str, ParseError> {
    let name = e.name();
    let full = name.into_inner();
    let local = full
        .iter()
        .rposition(|&b| b == b':')
        .map_or(full, |idx| &full[idx + 1..]);
    Ok(std::str::from_utf8(local)?)
}

/// Reads a single attribute value.
fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, ParseError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}

/// Parses an XML schema boolean literal.
fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" | "True" | "TRUE" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "0" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}
