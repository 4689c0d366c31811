//! The in-memory vocabulary model and the sink seam the pipeline drives.

use crate::error::{EmitError, VocabError};

// ── Data types ──

/// Normalized attribute data-type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Decimal,
    String,
    Date,
    Boolean,
    Byte,
    /// An enumerated data type, by name.
    Custom(String),
}

impl DataType {
    pub fn label(&self) -> &str {
        match self {
            DataType::Integer => "Integer",
            DataType::Decimal => "Decimal",
            DataType::String => "String",
            DataType::Date => "Date",
            DataType::Boolean => "Boolean",
            DataType::Byte => "Byte",
            DataType::Custom(name) => name,
        }
    }
}

// ── Model nodes ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumLiteral {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    /// Always `Integer` for enumerations derived from described enums.
    pub base_data_type: String,
    pub literals: Vec<EnumLiteral>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    Default,
    /// Source property is marked "not persisted".
    ExtendedTransient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub data_type: DataType,
    pub mode: AttributeMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub supertype: Option<String>,
    pub identity: Option<String>,
    pub attributes: Vec<Attribute>,
    pub datastore_persistent: bool,
    pub datastore_caching: bool,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype: None,
            identity: None,
            attributes: Vec::new(),
            datastore_persistent: false,
            datastore_caching: false,
        }
    }
}

/// The back-navigation end of a bidirectional association. Lives on the
/// target entity and points at the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OppositeEnd {
    pub role: String,
    pub target: String,
    pub many: bool,
    pub mandatory: bool,
}

/// One association, stored once per unordered (entity, role) pair. The
/// owner side is `source`/`role`/`target`; a populated `opposite` makes it
/// bidirectionally navigable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub source: String,
    pub role: String,
    pub target: String,
    pub many: bool,
    pub mandatory: bool,
    pub opposite: Option<OppositeEnd>,
}

// ── Sink seam ──

/// The model-building sink the emitter drives. Registration order is
/// mandated: enum types, then entities, then associations — association and
/// enum-attribute endpoints must already be registered.
pub trait VocabularySink {
    fn add_enum_type(&mut self, enum_type: EnumType) -> Result<(), VocabError>;
    fn add_entity(&mut self, entity: Entity) -> Result<(), VocabError>;
    fn has_entity(&self, name: &str) -> bool;
    /// Whether an association already exists for (entity, role), matching
    /// either side of a stored association.
    fn has_association(&self, entity: &str, role: &str) -> bool;
    fn add_association(&mut self, association: Association) -> Result<(), VocabError>;
    fn set_entity_identity(&mut self, entity: &str, property: &str) -> Result<(), VocabError>;
    /// Commit the model. In-memory sinks treat this as a no-op.
    fn save(&mut self) -> Result<(), VocabError>;
}

// ── In-memory vocabulary ──

/// Ordered in-memory model; also the reference `VocabularySink` used by the
/// file sink and by tests.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub name: String,
    pub enum_types: Vec<EnumType>,
    pub entities: Vec<Entity>,
    pub associations: Vec<Association>,
}

impl Vocabulary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enum_types.iter().find(|e| e.name == name)
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }
}

impl VocabularySink for Vocabulary {
    fn add_enum_type(&mut self, enum_type: EnumType) -> Result<(), VocabError> {
        if self.enum_type(&enum_type.name).is_some() {
            return Err(EmitError::DuplicateEnumType(enum_type.name).into());
        }
        self.enum_types.push(enum_type);
        Ok(())
    }

    fn add_entity(&mut self, entity: Entity) -> Result<(), VocabError> {
        if self.entity(&entity.name).is_some() {
            return Err(EmitError::DuplicateEntity(entity.name).into());
        }
        for attribute in &entity.attributes {
            if let DataType::Custom(enum_name) = &attribute.data_type {
                if self.enum_type(enum_name).is_none() {
                    return Err(EmitError::UnknownEnumType {
                        entity: entity.name.clone(),
                        attribute: attribute.name.clone(),
                        enum_type: enum_name.clone(),
                    }
                    .into());
                }
            }
        }
        self.entities.push(entity);
        Ok(())
    }

    fn has_entity(&self, name: &str) -> bool {
        self.entity(name).is_some()
    }

    fn has_association(&self, entity: &str, role: &str) -> bool {
        self.associations.iter().any(|a| {
            (a.source == entity && a.role == role)
                || a
                    .opposite
                    .as_ref()
                    .is_some_and(|o| a.target == entity && o.role == role)
        })
    }

    fn add_association(&mut self, association: Association) -> Result<(), VocabError> {
        if !self.has_entity(&association.source) {
            return Err(EmitError::UnknownEntity(association.source).into());
        }
        if !self.has_entity(&association.target) {
            return Err(EmitError::UnknownEntity(association.target).into());
        }
        self.associations.push(association);
        Ok(())
    }

    fn set_entity_identity(&mut self, entity: &str, property: &str) -> Result<(), VocabError> {
        match self.entity_mut(entity) {
            Some(e) => {
                e.identity = Some(property.to_string());
                Ok(())
            }
            None => Err(EmitError::UnknownEntity(entity.to_string()).into()),
        }
    }

    fn save(&mut self) -> Result<(), VocabError> {
        Ok(())
    }
}
