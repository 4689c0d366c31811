//! Type descriptor DTOs — the serialized description of a compiled module's
//! public types that the generator scans instead of runtime reflection.

use serde::{Deserialize, Serialize};

// ── Helper defaults for serde ──

fn is_false(v: &bool) -> bool {
    !v
}

// ── Top-level document ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorDocument {
    /// Module name; also names the generated `.ecore` file.
    pub module: String,
    /// Modules whose types may be referenced (base types, association
    /// targets) but are not themselves scanned.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    pub types: Vec<TypeDescriptor>,
}

// ── Types ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Enum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub kind: TypeKind,
    /// Reference to the supertype, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Open generic type.
    #[serde(default, skip_serializing_if = "is_false")]
    pub generic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub compiler_generated: bool,
    /// Explicit "exclude from mapping" marker.
    #[serde(default, skip_serializing_if = "is_false")]
    pub excluded: bool,
    /// Present when the type itself is iterable; names the element type.
    /// Inherited through the `base` chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_of: Option<String>,
    /// Declared-only properties (classes). The inherited surface is
    /// represented by the `base` link, never repeated here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDescriptor>,
    /// Ordered members (enums).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<EnumMember>,
}

impl TypeDescriptor {
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

// ── Properties ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Type expression, e.g. `int`, `Kid`, `list<Kid>`, `Kid[]`.
    #[serde(rename = "type")]
    pub type_expr: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub identity: bool,
    /// "Not persisted" marker; emitted as an extended/transient attribute.
    #[serde(default, skip_serializing_if = "is_false")]
    pub transient: bool,
}

impl PropertyDescriptor {
    /// Parsed form of `type_expr`, or `None` when malformed. Malformed
    /// expressions never fail a load; the classifier skips the property.
    pub fn parsed_type(&self) -> Option<TypeExpr> {
        TypeExpr::parse(&self.type_expr)
    }
}

// ── Type expressions ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    String,
    Date,
    DateTime,
    Guid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Scalar(ScalarType),
    /// Reference to a described type, short (`Kid`) or fully qualified
    /// (`SampleModel.Model.Kid`).
    Named(String),
    /// One sequence wrapper: `list<X>`, `set<X>`, or `X[]`.
    Sequence(Box<TypeExpr>),
}

impl TypeExpr {
    /// Parse a type expression. Three forms only: a builtin scalar, a named
    /// reference, or a single sequence wrapper around either.
    pub fn parse(input: &str) -> Option<TypeExpr> {
        let s = input.trim();
        if let Some(inner) = s.strip_suffix("[]") {
            return Some(TypeExpr::Sequence(Box::new(Self::parse(inner)?)));
        }
        for prefix in ["list<", "set<"] {
            if let Some(rest) = s.strip_prefix(prefix) {
                let inner = rest.strip_suffix('>')?;
                return Some(TypeExpr::Sequence(Box::new(Self::parse(inner)?)));
            }
        }
        if let Some(scalar) = ScalarType::parse(s) {
            return Some(TypeExpr::Scalar(scalar));
        }
        if is_type_reference(s) {
            return Some(TypeExpr::Named(s.to_string()));
        }
        None
    }
}

impl ScalarType {
    fn parse(s: &str) -> Option<ScalarType> {
        let scalar = match s {
            "bool" => ScalarType::Bool,
            "byte" => ScalarType::Byte,
            "char" => ScalarType::Char,
            "short" => ScalarType::Short,
            "int" => ScalarType::Int,
            "long" => ScalarType::Long,
            "float" => ScalarType::Float,
            "double" => ScalarType::Double,
            "decimal" => ScalarType::Decimal,
            "string" => ScalarType::String,
            "date" => ScalarType::Date,
            "datetime" => ScalarType::DateTime,
            "guid" => ScalarType::Guid,
            _ => return None,
        };
        Some(scalar)
    }
}

/// A dotted identifier path: each segment starts with a letter or underscore
/// and continues alphanumeric/underscore.
fn is_type_reference(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
                _ => return false,
            }
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalars() {
        assert_eq!(
            TypeExpr::parse("int"),
            Some(TypeExpr::Scalar(ScalarType::Int))
        );
        assert_eq!(
            TypeExpr::parse("datetime"),
            Some(TypeExpr::Scalar(ScalarType::DateTime))
        );
        assert_eq!(
            TypeExpr::parse(" guid "),
            Some(TypeExpr::Scalar(ScalarType::Guid))
        );
    }

    #[test]
    fn parses_named_references() {
        assert_eq!(
            TypeExpr::parse("Kid"),
            Some(TypeExpr::Named("Kid".to_string()))
        );
        assert_eq!(
            TypeExpr::parse("SampleModel.Model.Kid"),
            Some(TypeExpr::Named("SampleModel.Model.Kid".to_string()))
        );
    }

    #[test]
    fn parses_sequence_wrappers() {
        let kid = TypeExpr::Named("Kid".to_string());
        assert_eq!(
            TypeExpr::parse("list<Kid>"),
            Some(TypeExpr::Sequence(Box::new(kid.clone())))
        );
        assert_eq!(
            TypeExpr::parse("set<Kid>"),
            Some(TypeExpr::Sequence(Box::new(kid.clone())))
        );
        assert_eq!(
            TypeExpr::parse("Kid[]"),
            Some(TypeExpr::Sequence(Box::new(kid)))
        );
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert_eq!(TypeExpr::parse(""), None);
        assert_eq!(TypeExpr::parse("list<"), None);
        assert_eq!(TypeExpr::parse("list<Kid"), None);
        assert_eq!(TypeExpr::parse("123Kid"), None);
        assert_eq!(TypeExpr::parse("Kid..Adult"), None);
        assert_eq!(TypeExpr::parse("a b"), None);
    }

    #[test]
    fn descriptor_full_name() {
        let t = TypeDescriptor {
            name: "Kid".to_string(),
            namespace: "SampleModel.Model".to_string(),
            kind: TypeKind::Class,
            base: None,
            visibility: Visibility::Public,
            generic: false,
            compiler_generated: false,
            excluded: false,
            sequence_of: None,
            properties: vec![],
            members: vec![],
        };
        assert_eq!(t.full_name(), "SampleModel.Model.Kid");
    }

    #[test]
    fn document_round_trips_through_json() {
        let json = r#"{
            "module": "sample",
            "types": [
                { "name": "Kid", "namespace": "M", "kind": "class",
                  "base": "TicketHolder",
                  "properties": [
                    { "name": "Adult", "type": "Adult", "required": true }
                  ] },
                { "name": "ShirtSize", "namespace": "M", "kind": "enum",
                  "members": [ { "name": "Small", "value": 0 } ] }
            ]
        }"#;
        let doc: DescriptorDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.module, "sample");
        assert_eq!(doc.types.len(), 2);
        assert!(doc.types[0].properties[0].required);
        assert!(!doc.types[0].properties[0].transient);
        assert_eq!(doc.types[1].kind, TypeKind::Enum);
        assert_eq!(doc.types[1].members[0].value, 0);
    }
}
