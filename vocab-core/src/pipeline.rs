//! Orchestration: load → filter → three registration passes → save.
//!
//! Single-threaded and synchronous. The mandated pass order (enum types,
//! then entities, then associations) exists because association endpoints
//! and enum-typed attributes must already be registered with the sink.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::classify::{classify_property, PropertyClass};
use crate::config::EngineConfig;
use crate::descriptor::DescriptorDocument;
use crate::filter::vocabulary_types;
use crate::loader::{load_document, DirModuleResolver, ModuleResolver, TypeTable};
use crate::model::{Attribute, AttributeMode, Entity, EnumLiteral, EnumType, VocabularySink};
use crate::resolve::resolve_association;
use crate::sink::EcoreFileSink;
use crate::VocabError;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Descriptor document to introspect.
    pub input: PathBuf,
    /// Directory for the generated `.ecore` file.
    pub output_dir: PathBuf,
    /// Directory searched for imported modules; defaults to the input
    /// file's directory.
    pub dependency_dir: Option<PathBuf>,
    /// Namespace allow-list; empty means no restriction.
    pub namespaces: Vec<String>,
}

impl GenerateOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from("."),
            dependency_dir: None,
            namespaces: Vec::new(),
        }
    }

    fn dependency_dir(&self) -> PathBuf {
        self.dependency_dir.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

/// Run the whole pipeline against a file-backed sink. Returns the path of
/// the written model file, `<module>.ecore` in the output directory.
pub fn generate(options: &GenerateOptions) -> Result<PathBuf, VocabError> {
    let document = load_document(&options.input)?;
    let resolver = DirModuleResolver::new(options.dependency_dir());
    let output_path = options
        .output_dir
        .join(format!("{}.ecore", document.module));
    let mut sink = EcoreFileSink::new(
        document.module.clone(),
        output_path.clone(),
        EngineConfig::from_env(),
    );
    emit(document, &resolver, &options.namespaces, &mut sink)?;
    Ok(output_path)
}

/// Sequence a loaded document into an arbitrary sink and save it.
pub fn emit(
    document: DescriptorDocument,
    resolver: &dyn ModuleResolver,
    namespaces: &[String],
    sink: &mut dyn VocabularySink,
) -> Result<(), VocabError> {
    let table = TypeTable::build(document, resolver)?;
    let scan = vocabulary_types(&table, namespaces);

    let enum_count = scan.enums().count();
    let class_count = scan.classes().count();
    // One unit per type plus one per association pass over a class.
    let total = scan.len() + class_count;
    let mut completed = 0usize;
    info!(
        module = %table.module(),
        types = scan.len(),
        "generating vocabulary"
    );

    for t in scan.enums() {
        sink.add_enum_type(EnumType {
            name: t.name.clone(),
            base_data_type: "Integer".to_string(),
            literals: t
                .members
                .iter()
                .map(|m| EnumLiteral {
                    label: m.name.clone(),
                    value: m.value.to_string(),
                })
                .collect(),
        })?;
        completed += 1;
        debug!(completed, total, enum_type = %t.name, "registered enumerated data type");
    }
    info!(count = enum_count, "enumerated data types registered");

    for t in scan.classes() {
        let mut entity = Entity::new(t.name.clone());
        entity.supertype = t
            .base
            .as_deref()
            .and_then(|b| b.rsplit('.').next())
            .map(str::to_string);
        for p in &t.properties {
            match classify_property(&table, &scan, p) {
                PropertyClass::Attribute {
                    name,
                    data_type,
                    transient,
                } => entity.attributes.push(Attribute {
                    name,
                    data_type,
                    mode: if transient {
                        AttributeMode::ExtendedTransient
                    } else {
                        AttributeMode::Default
                    },
                }),
                // Third pass.
                PropertyClass::Association { .. } => {}
                PropertyClass::Skipped { reason } => {
                    debug!(type_name = %t.name, property = %p.name, ?reason, "property skipped");
                }
            }
        }
        sink.add_entity(entity)?;
        completed += 1;
        debug!(completed, total, entity = %t.name, "registered entity");
    }
    info!(count = class_count, "entities registered");

    let mut association_count = 0usize;
    for t in scan.classes() {
        for p in &t.properties {
            if resolve_association(&table, &scan, sink, t, p)? {
                association_count += 1;
            }
        }
        completed += 1;
        debug!(completed, total, entity = %t.name, "associations resolved");
    }
    info!(count = association_count, "associations registered");

    sink.save()
}
