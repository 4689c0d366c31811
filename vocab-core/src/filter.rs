//! Type Filter: selects which described types qualify as vocabulary types,
//! optionally restricted to an allow-list of namespaces.

use std::collections::HashSet;

use crate::descriptor::TypeDescriptor;
use crate::loader::TypeTable;

/// The ordered set of vocabulary types for one run, with membership lookup
/// for the classifier and resolver.
pub struct ScanSet<'a> {
    types: Vec<&'a TypeDescriptor>,
    names: HashSet<String>,
}

impl<'a> ScanSet<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a TypeDescriptor> + '_ {
        self.types.iter().copied()
    }

    pub fn enums(&self) -> impl Iterator<Item = &'a TypeDescriptor> + '_ {
        self.iter().filter(|t| t.is_enum())
    }

    pub fn classes(&self) -> impl Iterator<Item = &'a TypeDescriptor> + '_ {
        self.iter().filter(|t| !t.is_enum())
    }

    pub fn contains(&self, t: &TypeDescriptor) -> bool {
        self.names.contains(&t.full_name())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Apply the inclusion rules to the primary document's types, in declaration
/// order. Imported types are reference material only and never qualify.
pub fn vocabulary_types<'a>(table: &'a TypeTable, namespaces: &[String]) -> ScanSet<'a> {
    let mut types = Vec::new();
    for t in table.primary_types() {
        if t.compiler_generated || t.excluded {
            continue;
        }
        if !t.is_public() || t.generic {
            continue;
        }
        // Plain collection types are excluded entirely; enums that happen
        // to be iterable are kept.
        if table.is_sequence_like(t) && !t.is_enum() {
            continue;
        }
        if !namespaces.is_empty() && !namespaces.iter().any(|n| n == &t.namespace) {
            continue;
        }
        types.push(t);
    }
    let names = types.iter().map(|t| t.full_name()).collect();
    ScanSet { types, names }
}
