//! Association Resolver: builds a two-sided association description for an
//! association-candidate property, locating the opposite navigation
//! property on the target type when one exists.

use tracing::debug;

use crate::descriptor::{PropertyDescriptor, TypeDescriptor};
use crate::filter::ScanSet;
use crate::loader::TypeTable;
use crate::model::{Association, OppositeEnd, VocabularySink};
use crate::VocabError;

/// Resolve one association-candidate property of `owner` into the sink.
///
/// Returns `true` when a new association was registered. Properties whose
/// (unwrapped) element type is not a non-enum vocabulary type are ignored,
/// as is a (owner, role) pair the sink already holds.
pub fn resolve_association(
    table: &TypeTable,
    scan: &ScanSet<'_>,
    sink: &mut dyn VocabularySink,
    owner: &TypeDescriptor,
    property: &PropertyDescriptor,
) -> Result<bool, VocabError> {
    let Some(expr) = property.parsed_type() else {
        return Ok(false);
    };
    let Some(target) = table.association_target(&expr) else {
        return Ok(false);
    };
    if target.is_enum() || !scan.contains(target) {
        return Ok(false);
    }
    if sink.has_association(&owner.name, &property.name) {
        debug!(
            entity = %owner.name,
            role = %property.name,
            "association already registered, skipping"
        );
        return Ok(false);
    }

    let opposite = find_opposite(table, owner, target).map(|remote| {
        let many = remote
            .parsed_type()
            .map(|e| table.is_many(&e))
            .unwrap_or(false);
        OppositeEnd {
            role: remote.name.clone(),
            target: owner.name.clone(),
            many,
            mandatory: remote.required,
        }
    });

    if property.identity {
        sink.set_entity_identity(&owner.name, &property.name)?;
    }

    sink.add_association(Association {
        source: owner.name.clone(),
        role: property.name.clone(),
        target: target.name.clone(),
        many: table.is_many(&expr),
        mandatory: property.required,
        opposite,
    })?;
    Ok(true)
}

/// First declared property of `target` whose element type is the owning
/// type, in declaration order. Multiple candidate back-references are not
/// disambiguated further; the first one wins.
fn find_opposite<'a>(
    table: &TypeTable,
    owner: &TypeDescriptor,
    target: &'a TypeDescriptor,
) -> Option<&'a PropertyDescriptor> {
    let owner_name = owner.full_name();
    target.properties.iter().find(|p| {
        p.parsed_type()
            .and_then(|e| table.association_target(&e))
            .is_some_and(|t| t.full_name() == owner_name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorDocument, TypeKind, Visibility};
    use crate::filter::vocabulary_types;
    use crate::loader::ModuleResolver;
    use crate::model::{Entity, Vocabulary};

    fn class(name: &str) -> TypeDescriptor {
        TypeDescriptor {
            name: name.to_string(),
            namespace: "M".to_string(),
            kind: TypeKind::Class,
            base: None,
            visibility: Visibility::Public,
            generic: false,
            compiler_generated: false,
            excluded: false,
            sequence_of: None,
            properties: vec![],
            members: vec![],
        }
    }

    fn property(name: &str, type_expr: &str) -> PropertyDescriptor {
        PropertyDescriptor {
            name: name.to_string(),
            type_expr: type_expr.to_string(),
            required: false,
            identity: false,
            transient: false,
        }
    }

    struct NoImports;

    impl ModuleResolver for NoImports {
        fn resolve(&self, _module: &str) -> Result<DescriptorDocument, VocabError> {
            unreachable!("no imports in resolver tests")
        }
    }

    fn table(types: Vec<TypeDescriptor>) -> TypeTable {
        TypeTable::build(
            DescriptorDocument {
                module: "m".to_string(),
                imports: vec![],
                types,
            },
            &NoImports,
        )
        .unwrap()
    }

    fn sink_with(entities: &[&str]) -> Vocabulary {
        let mut vocabulary = Vocabulary::new("m");
        for name in entities {
            vocabulary.add_entity(Entity::new(*name)).unwrap();
        }
        vocabulary
    }

    fn parent_child_table() -> TypeTable {
        let mut adult = class("Adult");
        adult.properties = vec![property("Kids", "list<Kid>")];
        let mut kid = class("Kid");
        let mut back = property("Adult", "Adult");
        back.required = true;
        kid.properties = vec![back];
        table(vec![adult, kid])
    }

    #[test]
    fn bidirectional_association_is_symmetric() {
        let table = parent_child_table();
        let scan = vocabulary_types(&table, &[]);
        let mut sink = sink_with(&["Adult", "Kid"]);

        let owner = table.resolve("Adult").unwrap();
        let added =
            resolve_association(&table, &scan, &mut sink, owner, &owner.properties[0]).unwrap();
        assert!(added);

        let association = &sink.associations[0];
        assert_eq!(association.source, "Adult");
        assert_eq!(association.role, "Kids");
        assert_eq!(association.target, "Kid");
        assert!(association.many);
        assert!(!association.mandatory);

        let opposite = association.opposite.as_ref().unwrap();
        assert_eq!(opposite.role, "Adult");
        assert_eq!(opposite.target, "Adult");
        assert!(!opposite.many);
        assert!(opposite.mandatory);
    }

    #[test]
    fn missing_back_reference_yields_one_directional_association() {
        let mut adult = class("Adult");
        adult.properties = vec![property("Kids", "list<Kid>")];
        let table = table(vec![adult, class("Kid")]);
        let scan = vocabulary_types(&table, &[]);
        let mut sink = sink_with(&["Adult", "Kid"]);

        let owner = table.resolve("Adult").unwrap();
        resolve_association(&table, &scan, &mut sink, owner, &owner.properties[0]).unwrap();
        assert!(sink.associations[0].opposite.is_none());
    }

    #[test]
    fn resolving_twice_registers_one_association() {
        let table = parent_child_table();
        let scan = vocabulary_types(&table, &[]);
        let mut sink = sink_with(&["Adult", "Kid"]);
        let owner = table.resolve("Adult").unwrap();

        assert!(
            resolve_association(&table, &scan, &mut sink, owner, &owner.properties[0]).unwrap()
        );
        assert!(
            !resolve_association(&table, &scan, &mut sink, owner, &owner.properties[0]).unwrap()
        );
        assert_eq!(sink.associations.len(), 1);
    }

    #[test]
    fn reverse_side_is_found_by_either_role() {
        let table = parent_child_table();
        let scan = vocabulary_types(&table, &[]);
        let mut sink = sink_with(&["Adult", "Kid"]);

        let adult = table.resolve("Adult").unwrap();
        resolve_association(&table, &scan, &mut sink, adult, &adult.properties[0]).unwrap();

        // Visiting Kid.Adult afterwards finds the stored opposite side and
        // does not create a second association.
        let kid = table.resolve("Kid").unwrap();
        let added =
            resolve_association(&table, &scan, &mut sink, kid, &kid.properties[0]).unwrap();
        assert!(!added);
        assert_eq!(sink.associations.len(), 1);
    }

    #[test]
    fn first_declared_back_reference_wins() {
        let mut adult = class("Adult");
        adult.properties = vec![property("Kids", "list<Kid>")];
        let mut kid = class("Kid");
        kid.properties = vec![
            property("Mother", "Adult"),
            property("Father", "Adult"),
        ];
        let table = table(vec![adult, kid]);
        let scan = vocabulary_types(&table, &[]);
        let mut sink = sink_with(&["Adult", "Kid"]);

        let owner = table.resolve("Adult").unwrap();
        resolve_association(&table, &scan, &mut sink, owner, &owner.properties[0]).unwrap();
        assert_eq!(
            sink.associations[0].opposite.as_ref().unwrap().role,
            "Mother"
        );
    }

    #[test]
    fn required_and_identity_markers_apply_to_owner_side() {
        let mut adult = class("Adult");
        let mut kids = property("Kids", "list<Kid>");
        kids.required = true;
        kids.identity = true;
        adult.properties = vec![kids];
        let table = table(vec![adult, class("Kid")]);
        let scan = vocabulary_types(&table, &[]);
        let mut sink = sink_with(&["Adult", "Kid"]);

        let owner = table.resolve("Adult").unwrap();
        resolve_association(&table, &scan, &mut sink, owner, &owner.properties[0]).unwrap();

        assert!(sink.associations[0].mandatory);
        assert_eq!(
            sink.entity("Adult").unwrap().identity.as_deref(),
            Some("Kids")
        );
    }

    #[test]
    fn non_association_properties_are_ignored() {
        let mut adult = class("Adult");
        adult.properties = vec![property("Name", "string"), property("Ghost", "Stranger")];
        let table = table(vec![adult, class("Kid")]);
        let scan = vocabulary_types(&table, &[]);
        let mut sink = sink_with(&["Adult", "Kid"]);

        let owner = table.resolve("Adult").unwrap();
        for p in &owner.properties {
            assert!(!resolve_association(&table, &scan, &mut sink, owner, p).unwrap());
        }
        assert!(sink.associations.is_empty());
    }
}
