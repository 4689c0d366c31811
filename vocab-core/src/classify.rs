//! Property Classifier: decides whether each declared property becomes a
//! scalar/enum attribute, an association edge, or is skipped.

use crate::descriptor::{PropertyDescriptor, ScalarType, TypeExpr};
use crate::filter::ScanSet;
use crate::loader::TypeTable;
use crate::model::DataType;

/// Why a property produced neither an attribute nor an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The type expression is malformed or references an unknown type.
    UnknownType,
    /// The (element) type resolved but is not a vocabulary type.
    NonVocabularyType,
    /// An enum outside the vocabulary type set.
    ForeignEnum,
    /// A shape no rule covers, e.g. a sequence of scalars or enums.
    UnsupportedShape,
}

/// Classification outcome. Exactly one of the three per property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyClass {
    Attribute {
        name: String,
        data_type: DataType,
        transient: bool,
    },
    Association {
        name: String,
        /// Target entity name (short name, as registered with the sink).
        target: String,
        many: bool,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// Classify one declared property of a vocabulary class.
pub fn classify_property(
    table: &TypeTable,
    scan: &ScanSet<'_>,
    property: &PropertyDescriptor,
) -> PropertyClass {
    let Some(expr) = property.parsed_type() else {
        return PropertyClass::Skipped {
            reason: SkipReason::UnknownType,
        };
    };

    match &expr {
        TypeExpr::Scalar(scalar) => PropertyClass::Attribute {
            name: property.name.clone(),
            data_type: normalize_scalar(*scalar),
            transient: property.transient,
        },
        TypeExpr::Named(reference) => {
            let Some(named) = table.resolve(reference) else {
                return PropertyClass::Skipped {
                    reason: SkipReason::UnknownType,
                };
            };
            if named.is_enum() {
                if scan.contains(named) {
                    return PropertyClass::Attribute {
                        name: property.name.clone(),
                        data_type: DataType::Custom(named.name.clone()),
                        transient: property.transient,
                    };
                }
                return PropertyClass::Skipped {
                    reason: SkipReason::ForeignEnum,
                };
            }
            // A named sequence type associates with its element type.
            let target = table.sequence_element(named).unwrap_or(named);
            associate(table, scan, property, &expr, target)
        }
        TypeExpr::Sequence(inner) => {
            let TypeExpr::Named(reference) = inner.as_ref() else {
                return PropertyClass::Skipped {
                    reason: SkipReason::UnsupportedShape,
                };
            };
            let Some(target) = table.resolve(reference) else {
                return PropertyClass::Skipped {
                    reason: SkipReason::UnknownType,
                };
            };
            if target.is_enum() {
                return PropertyClass::Skipped {
                    reason: SkipReason::UnsupportedShape,
                };
            }
            associate(table, scan, property, &expr, target)
        }
    }
}

fn associate(
    table: &TypeTable,
    scan: &ScanSet<'_>,
    property: &PropertyDescriptor,
    expr: &TypeExpr,
    target: &crate::descriptor::TypeDescriptor,
) -> PropertyClass {
    if target.is_enum() {
        // Enums never associate; the element of a named sequence chain can
        // land here.
        return PropertyClass::Skipped {
            reason: SkipReason::UnsupportedShape,
        };
    }
    if !scan.contains(target) {
        return PropertyClass::Skipped {
            reason: SkipReason::NonVocabularyType,
        };
    }
    PropertyClass::Association {
        name: property.name.clone(),
        target: target.name.clone(),
        many: table.is_many(expr),
    }
}

/// Data-type normalization for builtin scalars.
fn normalize_scalar(scalar: ScalarType) -> DataType {
    match scalar {
        ScalarType::Short | ScalarType::Int | ScalarType::Long => DataType::Integer,
        ScalarType::Date | ScalarType::DateTime => DataType::Date,
        ScalarType::Float | ScalarType::Double | ScalarType::Decimal => DataType::Decimal,
        ScalarType::Char | ScalarType::Guid | ScalarType::String => DataType::String,
        ScalarType::Bool => DataType::Boolean,
        ScalarType::Byte => DataType::Byte,
    }
}
