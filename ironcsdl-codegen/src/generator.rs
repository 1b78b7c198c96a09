//! Code generation orchestration.

use crate::error::CodegenError;
use crate::grouping::{FileGroup, group_types};
use crate::naming::module_name;
use crate::plan::{TypeDecl, box_recursive_fields, plan_type};
use crate::rust::{
    ModuleGenerator, SUPPORT_MODULE, SupportGenerator, generate_header, generate_mod_rs,
    generate_single_file,
};
use ironcsdl_schema::{AliasTable, Resolver, TypeModel};
use std::path::{Path, PathBuf};

/// Suffix of collection resource types.
const COLLECTION_SUFFIX: &str = "Collection";

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Name of the generated module, written into the header.
    pub module_name: String,
    /// Emit everything into one file instead of one file per group.
    pub single_file: bool,
    /// Skip entity types, other than enumerations, whose name ends in
    /// `Collection`.
    pub ignore_collections: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module_name: "standard".to_string(),
            single_file: false,
            ignore_collections: false,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module name.
    #[must_use]
    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = module_name.into();
        self
    }

    /// Sets single-file output.
    #[must_use]
    pub fn with_single_file(mut self, single_file: bool) -> Self {
        self.single_file = single_file;
        self
    }

    /// Sets whether collection resources are skipped.
    #[must_use]
    pub fn with_ignore_collections(mut self, ignore_collections: bool) -> Self {
        self.ignore_collections = ignore_collections;
        self
    }
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Rust code generator over a folded type model.
pub struct Generator<'a> {
    model: &'a TypeModel,
    aliases: &'a AliasTable,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator with the default configuration.
    #[must_use]
    pub fn new(model: &'a TypeModel, aliases: &'a AliasTable) -> Self {
        Self {
            model,
            aliases,
            config: GeneratorConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Groups the folded types into output modules.
    #[must_use]
    pub fn groups(&self) -> Vec<FileGroup<'a>> {
        let ignore_collections = self.config.ignore_collections;
        group_types(
            self.model
                .iter()
                .map(|(_, ty)| ty)
                .filter(move |ty| {
                    !(ignore_collections
                        && !ty.is_complex
                        && !ty.is_enum()
                        && ty.name.ends_with(COLLECTION_SUFFIX))
                }),
        )
    }

    /// Plans every declaration of every group, keyed by module name.
    ///
    /// # Errors
    /// Returns [`CodegenError::UnrecognizedShape`] for a type that cannot be
    /// emitted.
    pub fn plan(&self) -> Result<Vec<(String, Vec<TypeDecl>)>, CodegenError> {
        let resolver = Resolver::new(self.model, self.aliases);
        let mut planned = Vec::new();

        for group in self.groups() {
            let decls = group
                .types()
                .map(|ty| plan_type(ty, &resolver))
                .collect::<Result<Vec<_>, _>>()?;
            if decls.iter().all(|d| *d == TypeDecl::Empty) {
                tracing::debug!("group {} has nothing to emit", group.name);
                continue;
            }
            planned.push((module_name(&group.name), decls));
        }
        box_recursive_fields(planned.iter_mut().flat_map(|(_, decls)| decls.iter_mut()));
        Ok(planned)
    }

    /// Generates the output files.
    ///
    /// # Returns
    /// `<module>.rs` in single-file mode; otherwise `mod.rs`, the support
    /// module and one file per group.
    ///
    /// # Errors
    /// Returns `CodegenError` if planning fails.
    pub fn generate(&self) -> Result<Vec<GeneratedFile>, CodegenError> {
        let planned = self.plan()?;
        let declarations: usize = planned
            .iter()
            .map(|(_, decls)| decls.iter().filter(|d| d.name().is_some()).count())
            .sum();
        tracing::info!(
            "generated {} declarations in {} modules",
            declarations,
            planned.len()
        );

        if self.config.single_file {
            return Ok(vec![GeneratedFile {
                path: PathBuf::from(format!("{}.rs", module_name(&self.config.module_name))),
                contents: generate_single_file(&self.config.module_name, &planned),
            }]);
        }

        let mut files = Vec::with_capacity(planned.len() + 2);
        let mut modules = vec![SUPPORT_MODULE.to_string()];

        let mut support = generate_header(&self.config.module_name);
        support.push_str(&SupportGenerator::new().generate());
        files.push(GeneratedFile {
            path: PathBuf::from(format!("{SUPPORT_MODULE}.rs")),
            contents: support,
        });

        for (module, decls) in &planned {
            files.push(GeneratedFile {
                path: PathBuf::from(format!("{module}.rs")),
                contents: ModuleGenerator::new(module, decls).generate(),
            });
            modules.push(module.clone());
        }

        files.push(GeneratedFile {
            path: PathBuf::from("mod.rs"),
            contents: generate_mod_rs(&self.config.module_name, &modules),
        });
        Ok(files)
    }

    /// Generates the output files and writes them under `dir`.
    ///
    /// # Returns
    /// Paths of the written files.
    ///
    /// # Errors
    /// Returns `CodegenError` if planning fails or a file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for file in self.generate()? {
            let path = dir.join(&file.path);
            std::fs::write(&path, file.contents)?;
            tracing::debug!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::FieldDecl;
    use ironcsdl_schema::{EnumMember, PropertyType, Type, fold_model};
    use tempfile::TempDir;

    fn model() -> (TypeModel, AliasTable) {
        let mut model: TypeModel = [
            Type::entity("Widget.v1_0_0", "Widget")
                .with_base("Resource.v1_0_0.Resource")
                .with_property("Size", PropertyType::new("Edm.Int64")),
            Type::entity("Widget", "Widget"),
            Type::entity("WidgetCollection", "WidgetCollection")
                .with_property("Members", PropertyType::navigation("Collection(Widget.Widget)")),
            Type::complex("Gadget.v1_0_0", "GadgetOemActions"),
        ]
        .into_iter()
        .collect();
        let aliases = AliasTable::new();
        fold_model(&mut model, &aliases).unwrap();
        (model, aliases)
    }

    #[test]
    fn test_config_builder() {
        let config = GeneratorConfig::new()
            .with_module_name("redfish")
            .with_single_file(true)
            .with_ignore_collections(true);
        assert_eq!(config.module_name, "redfish");
        assert!(config.single_file);
        assert!(config.ignore_collections);
        assert_eq!(GeneratorConfig::default().module_name, "standard");
    }

    #[test]
    fn test_generate_files() {
        let (model, aliases) = model();
        let files = Generator::new(&model, &aliases).generate().unwrap();
        let paths: Vec<String> = files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["odata.rs", "widget.rs", "widget_collection.rs", "mod.rs"]
        );

        let widget = &files[1].contents;
        assert!(widget.contains("pub struct Widget {"));
        assert!(widget.contains("pub size: Option<i64>,"));
        assert!(files[3].contents.contains("pub use widget::*;"));
    }

    #[test]
    fn test_ignore_collections() {
        let (model, aliases) = model();
        let generator = Generator::new(&model, &aliases)
            .with_config(GeneratorConfig::new().with_ignore_collections(true));
        let files = generator.generate().unwrap();
        assert!(files.iter().all(|f| f.path != Path::new("widget_collection.rs")));
    }

    #[test]
    fn test_ignore_collections_keeps_enums() {
        let (mut model, aliases) = model();
        let mut kind = Type::entity("Gadget.v1_0_0", "KindCollection");
        kind.members.push(EnumMember::new("Rack"));
        model.insert(kind);
        let generator = Generator::new(&model, &aliases)
            .with_config(GeneratorConfig::new().with_ignore_collections(true));
        let files = generator.generate().unwrap();
        let gadget = files
            .iter()
            .find(|f| f.path == Path::new("gadget.rs"))
            .unwrap();
        assert!(gadget.contents.contains("pub enum GadgetKindCollection {"));
    }

    #[test]
    fn test_recursion_across_modules_is_boxed() {
        let mut model: TypeModel = [
            Type::complex("Widget.v1_0_0", "Slot")
                .with_property("Gadget", PropertyType::new("Gadget.v1_0_0.Holder")),
            Type::complex("Gadget.v1_0_0", "Holder")
                .with_property("Slot", PropertyType::new("Widget.v1_0_0.Slot")),
        ]
        .into_iter()
        .collect();
        let aliases = AliasTable::new();
        fold_model(&mut model, &aliases).unwrap();

        let planned = Generator::new(&model, &aliases).plan().unwrap();
        let rendered: Vec<String> = planned
            .iter()
            .flat_map(|(_, decls)| decls)
            .filter_map(|decl| match decl {
                TypeDecl::Struct(s) => Some(s),
                _ => None,
            })
            .flat_map(|s| s.fields.iter().map(FieldDecl::rust_type))
            .filter(|ty| ty.contains("Box<"))
            .collect();
        assert_eq!(rendered.len(), 2);
        assert!(rendered.contains(&"Option<Box<GadgetHolder>>".to_string()));
        assert!(rendered.contains(&"Option<Box<WidgetSlot>>".to_string()));
    }

    #[test]
    fn test_single_file() {
        let (model, aliases) = model();
        let generator = Generator::new(&model, &aliases)
            .with_config(GeneratorConfig::new().with_single_file(true).with_module_name("redfish"));
        let files = generator.generate().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("redfish.rs"));
        assert!(files[0].contents.starts_with("//! `redfish` CSDL bindings."));
        assert!(files[0].contents.contains("pub mod widget {"));
    }

    #[test]
    fn test_write_to() {
        let (model, aliases) = model();
        let dir = TempDir::new().unwrap();
        let written = Generator::new(&model, &aliases).write_to(dir.path()).unwrap();
        assert_eq!(written.len(), 4);
        assert!(dir.path().join("mod.rs").exists());
    }
}
