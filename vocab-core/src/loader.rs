//! Descriptor document loading, import resolution, and the merged type
//! table the rest of the pipeline works against.
//!
//! A read or parse failure of the primary document is fatal. Individual
//! type entries that fail structural validation are dropped with a warning
//! and the load continues with the surviving subset.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::descriptor::{DescriptorDocument, TypeDescriptor, TypeExpr};
use crate::error::{DescriptorError, VocabError};

/// Load one descriptor document from a `.json`, `.yaml`, or `.yml` file.
pub fn load_document(path: &Path) -> Result<DescriptorDocument, VocabError> {
    let text = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mut document: DescriptorDocument = match extension {
        "json" => serde_json::from_str(&text)?,
        "yaml" | "yml" => serde_yaml::from_str(&text)?,
        _ => {
            return Err(DescriptorError::UnsupportedExtension {
                path: path.display().to_string(),
            }
            .into())
        }
    };
    document.types.retain(|t| match validate_type(t) {
        Ok(()) => true,
        Err(reason) => {
            warn!(type_name = %t.name, %reason, "dropping malformed type entry");
            false
        }
    });
    debug!(module = %document.module, types = document.types.len(), "descriptor loaded");
    Ok(document)
}

fn validate_type(t: &TypeDescriptor) -> Result<(), String> {
    if t.name.is_empty() {
        return Err("empty type name".to_string());
    }
    if t.is_enum() && t.members.is_empty() {
        return Err("enum without members".to_string());
    }
    let mut member_names = HashSet::new();
    let mut member_values = HashSet::new();
    for m in &t.members {
        if !member_names.insert(m.name.as_str()) {
            return Err(format!("duplicate enum member '{}'", m.name));
        }
        if !member_values.insert(m.value) {
            return Err(format!("colliding enum member value {}", m.value));
        }
    }
    let mut property_names = HashSet::new();
    for p in &t.properties {
        if p.name.is_empty() {
            return Err("property with empty name".to_string());
        }
        if !property_names.insert(p.name.as_str()) {
            return Err(format!("duplicate property '{}'", p.name));
        }
    }
    Ok(())
}

// ── Import resolution ──

/// Resolves an imported module name to its descriptor document. Injected
/// rather than registered as a process-global hook.
pub trait ModuleResolver {
    fn resolve(&self, module: &str) -> Result<DescriptorDocument, VocabError>;
}

/// Production resolver: looks for `<module>.json`, then `<module>.yaml`,
/// then `<module>.yml` in a single dependency directory.
pub struct DirModuleResolver {
    dir: PathBuf,
}

impl DirModuleResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ModuleResolver for DirModuleResolver {
    fn resolve(&self, module: &str) -> Result<DescriptorDocument, VocabError> {
        for ext in ["json", "yaml", "yml"] {
            let candidate = self.dir.join(format!("{module}.{ext}"));
            if candidate.is_file() {
                debug!(module, path = %candidate.display(), "resolved imported module");
                return load_document(&candidate);
            }
        }
        Err(DescriptorError::ModuleNotFound {
            module: module.to_string(),
            dir: self.dir.display().to_string(),
        }
        .into())
    }
}

// ── Type table ──

/// All known types: the primary document's types first (the only scan
/// candidates), then types pulled in through `imports` (usable as base
/// types, element types, and opposite-property owners).
pub struct TypeTable {
    module: String,
    types: Vec<TypeDescriptor>,
    primary_count: usize,
}

impl TypeTable {
    /// Merge the primary document with its resolved imports. Each import is
    /// resolved exactly once; a resolution failure is fatal.
    pub fn build(
        document: DescriptorDocument,
        resolver: &dyn ModuleResolver,
    ) -> Result<Self, VocabError> {
        let mut types = document.types;
        let primary_count = types.len();
        let mut seen = HashSet::new();
        for import in &document.imports {
            if !seen.insert(import.clone()) {
                continue;
            }
            let imported = resolver.resolve(import)?;
            types.extend(imported.types);
        }
        Ok(Self {
            module: document.module,
            types,
            primary_count,
        })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn primary_types(&self) -> &[TypeDescriptor] {
        &self.types[..self.primary_count]
    }

    /// Resolve a type reference: exact `namespace.name` match first, else a
    /// unique short-name match. Ambiguous or unknown references resolve to
    /// nothing and downstream rules degrade.
    pub fn resolve(&self, reference: &str) -> Option<&TypeDescriptor> {
        if let Some(t) = self.types.iter().find(|t| t.full_name() == reference) {
            return Some(t);
        }
        let mut short_matches = self.types.iter().filter(|t| t.name == reference);
        match (short_matches.next(), short_matches.next()) {
            (Some(t), None) => Some(t),
            _ => None,
        }
    }

    /// Whether the type itself is iterable: `sequence_of` declared on it or
    /// anywhere up its `base` chain.
    pub fn is_sequence_like(&self, t: &TypeDescriptor) -> bool {
        let mut seen = HashSet::new();
        let mut current = t;
        loop {
            if current.sequence_of.is_some() {
                return true;
            }
            match current.base.as_deref().and_then(|b| self.resolve(b)) {
                Some(base) if seen.insert(base.full_name()) => current = base,
                _ => return false,
            }
        }
    }

    /// The element type of a sequence-like type, walking the `base` chain
    /// to the nearest `sequence_of` declaration.
    pub fn sequence_element(&self, t: &TypeDescriptor) -> Option<&TypeDescriptor> {
        let mut seen = HashSet::new();
        let mut current = t;
        loop {
            if let Some(element) = current.sequence_of.as_deref() {
                return self.resolve(element);
            }
            match current.base.as_deref().and_then(|b| self.resolve(b)) {
                Some(base) if seen.insert(base.full_name()) => current = base,
                _ => return None,
            }
        }
    }

    /// The association target of a property type: the type itself for a
    /// plain reference, or the contained element type after unwrapping one
    /// sequence level (an explicit wrapper or a named sequence-like type).
    pub fn association_target(&self, expr: &TypeExpr) -> Option<&TypeDescriptor> {
        match expr {
            TypeExpr::Scalar(_) => None,
            TypeExpr::Sequence(inner) => match inner.as_ref() {
                TypeExpr::Named(name) => self.resolve(name),
                _ => None,
            },
            TypeExpr::Named(name) => {
                let t = self.resolve(name)?;
                Some(self.sequence_element(t).unwrap_or(t))
            }
        }
    }

    /// Cardinality of a property type: many iff it is sequence-shaped.
    pub fn is_many(&self, expr: &TypeExpr) -> bool {
        match expr {
            TypeExpr::Sequence(_) => true,
            TypeExpr::Named(name) => self
                .resolve(name)
                .map(|t| self.is_sequence_like(t))
                .unwrap_or(false),
            TypeExpr::Scalar(_) => false,
        }
    }
}
