//! Input file discovery and loading.

use crate::error::ParseError;
use crate::parser::{document_name, parse_document, parse_document_file};
use crate::records::{Document, RecordSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Extension of CSDL document files.
pub const DOCUMENT_EXTENSION: &str = "xml";

/// Extension of document archives.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Expands input paths into the list of CSDL documents and archives to load.
///
/// Files are taken as given; directories are walked recursively for `.xml`
/// files, in sorted order.
///
/// # Errors
/// Returns `ParseError` if a path cannot be read or names a file that is
/// neither an `.xml` document nor a `.zip` archive.
pub fn collect_documents<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>, ParseError> {
    let mut documents = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            walk_dir(input, &mut documents)?;
        } else if is_document(input) || is_archive(input) {
            documents.push(input.to_path_buf());
        } else {
            return Err(ParseError::invalid_structure(format!(
                "unsupported input file: {}",
                input.display()
            ))
            .in_document(document_name(input)));
        }
    }
    Ok(documents)
}

fn walk_dir(dir: &Path, documents: &mut Vec<PathBuf>) -> Result<(), ParseError> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_dir(&path, documents)?;
        } else if is_document(&path) {
            documents.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn is_document(path: &Path) -> bool {
    has_extension(path, DOCUMENT_EXTENSION)
}

fn is_archive(path: &Path) -> bool {
    has_extension(path, ARCHIVE_EXTENSION)
}

/// Parses every `.xml` member of a ZIP archive.
///
/// Members are named by their file stem; directories and other files are
/// skipped.
///
/// # Errors
/// Returns `ParseError` if the archive cannot be read, wrapped with the
/// archive name, or if a member fails to parse, wrapped with the member name.
pub fn parse_archive(path: &Path) -> Result<Vec<Document>, ParseError> {
    let archive_name = document_name(path);
    let file = File::open(path).map_err(|e| ParseError::from(e).in_document(&archive_name))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ParseError::from(e).in_document(&archive_name))?;

    let mut documents = Vec::new();
    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|e| ParseError::from(e).in_document(&archive_name))?;
        let member_path = PathBuf::from(member.name());
        if member.is_dir() || !is_document(&member_path) {
            continue;
        }

        let name = document_name(&member_path);
        let mut xml = String::new();
        member
            .read_to_string(&mut xml)
            .map_err(|e| ParseError::from(e).in_document(&name))?;
        tracing::debug!("loading {} from {}", member_path.display(), path.display());
        documents.push(parse_document(&xml).map_err(|e| e.in_document(&name))?);
    }
    Ok(documents)
}

/// Loads every document reachable from the input paths into one record set.
///
/// # Errors
/// Returns the first `ParseError`, wrapped with the offending document name.
pub fn load_paths<P: AsRef<Path>>(inputs: &[P]) -> Result<RecordSet, ParseError> {
    let mut records = RecordSet::new();
    let documents = collect_documents(inputs)?;
    for path in &documents {
        if is_archive(path) {
            for document in parse_archive(path)? {
                records.add_document(document);
            }
        } else {
            tracing::debug!("loading {}", path.display());
            records.add_document(parse_document_file(path)?);
        }
    }
    tracing::debug!(
        "loaded {} documents into {} namespaces",
        documents.len(),
        records.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    const DOC: &str = r#"<edmx:Edmx xmlns:edmx="x" Version="4.0"><edmx:DataServices>
<Schema Namespace="Widget.v1_0_0"><EntityType Name="Widget"/></Schema>
</edmx:DataServices></edmx:Edmx>"#;

    #[test]
    fn test_collect_walks_directories_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.xml"), DOC).unwrap();
        fs::write(dir.path().join("a.xml"), DOC).unwrap();
        fs::write(dir.path().join("readme.txt"), "skip").unwrap();
        fs::write(dir.path().join("nested").join("c.xml"), DOC).unwrap();

        let found = collect_documents(&[dir.path()]).unwrap();
        let names: Vec<String> = found.iter().map(|p| document_name(p)).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_collect_rejects_unsupported_file() {
        let dir = TempDir::new().unwrap();
        let tar = dir.path().join("bundle.tar");
        fs::write(&tar, "ustar").unwrap();

        let err = collect_documents(&[&tar]).unwrap_err();
        assert!(err.to_string().contains("bundle"));
    }

    fn write_archive(path: &Path, members: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, contents) in members {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_load_paths_reads_archive_members() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("bundle.zip");
        let gadget = DOC.replace("Widget", "Gadget");
        write_archive(
            &bundle,
            &[
                ("csdl/Widget_v1.xml", DOC),
                ("csdl/readme.txt", "skip"),
                ("Gadget_v1.xml", gadget.as_str()),
            ],
        );

        assert_eq!(collect_documents(&[&bundle]).unwrap(), vec![bundle.clone()]);
        let documents = parse_archive(&bundle).unwrap();
        assert_eq!(documents.len(), 2);

        let records = load_paths(&[&bundle]).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.get("Widget.v1_0_0").is_some());
        assert!(records.get("Gadget.v1_0_0").is_some());
    }

    #[test]
    fn test_archive_names_bad_member() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("bundle.zip");
        write_archive(&bundle, &[("Widget_v1.xml", DOC), ("csdl/Broken_v1.xml", "<Schema>")]);

        let err = load_paths(&[&bundle]).unwrap_err();
        assert!(matches!(err, ParseError::Document { ref document, .. } if document == "Broken_v1"));
    }

    #[test]
    fn test_archive_names_unreadable_archive() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("bundle.zip");
        fs::write(&bundle, "not an archive").unwrap();

        let err = parse_archive(&bundle).unwrap_err();
        assert!(matches!(err, ParseError::Document { ref document, ref source }
            if document == "bundle" && matches!(**source, ParseError::Zip(_))));
    }

    #[test]
    fn test_load_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Widget_v1.xml"), DOC).unwrap();

        let records = load_paths(&[dir.path()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records.get("Widget.v1_0_0").unwrap().entity_types.len(), 1);
    }

    #[test]
    fn test_load_paths_names_bad_document() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Broken.xml"), "<Schema>").unwrap();

        let err = load_paths(&[dir.path()]).unwrap_err();
        assert!(matches!(err, ParseError::Document { ref document, .. } if document == "Broken"));
    }
}
