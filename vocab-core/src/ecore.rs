//! Write-only `.ecore` (EMF/XMI) serialization of a vocabulary model.
//!
//! Deterministic string building: identical input produces identical bytes.

use std::fmt::Write;

use crate::model::{Attribute, AttributeMode, DataType, Entity, Vocabulary};
use crate::VocabError;

const ANNOTATION_SOURCE: &str = "vocabulary";

/// Serialize a vocabulary to an Ecore `EPackage` document.
pub fn to_xml(vocabulary: &Vocabulary) -> Result<String, VocabError> {
    let mut xml = String::new();
    let package = xml_escape(&vocabulary.name);

    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        xml,
        r#"<ecore:EPackage xmi:version="2.0" xmlns:xmi="http://www.omg.org/XMI" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:ecore="http://www.eclipse.org/emf/2002/Ecore" name="{package}" nsURI="http://{package}" nsPrefix="{package}">"#
    )?;

    for enum_type in &vocabulary.enum_types {
        writeln!(
            xml,
            r#"  <eClassifiers xsi:type="ecore:EEnum" name="{}">"#,
            xml_escape(&enum_type.name)
        )?;
        writeln!(xml, r#"    <eAnnotations source="{ANNOTATION_SOURCE}">"#)?;
        writeln!(
            xml,
            r#"      <details key="baseDataType" value="{}"/>"#,
            xml_escape(&enum_type.base_data_type)
        )?;
        writeln!(xml, r#"      <details key="enumeration" value="true"/>"#)?;
        writeln!(xml, r#"    </eAnnotations>"#)?;
        for literal in &enum_type.literals {
            writeln!(
                xml,
                r#"    <eLiterals name="{}" value="{}"/>"#,
                xml_escape(&literal.label),
                xml_escape(&literal.value)
            )?;
        }
        writeln!(xml, r#"  </eClassifiers>"#)?;
    }

    for entity in &vocabulary.entities {
        write_entity(&mut xml, vocabulary, entity)?;
    }

    writeln!(xml, r#"</ecore:EPackage>"#)?;
    Ok(xml)
}

fn write_entity(xml: &mut String, vocabulary: &Vocabulary, entity: &Entity) -> Result<(), VocabError> {
    let supertype_attr = entity
        .supertype
        .as_deref()
        .map(|s| format!(r##" eSuperTypes="#//{}""##, xml_escape(s)))
        .unwrap_or_default();
    writeln!(
        xml,
        r#"  <eClassifiers xsi:type="ecore:EClass" name="{}"{}>"#,
        xml_escape(&entity.name),
        supertype_attr
    )?;
    writeln!(xml, r#"    <eAnnotations source="{ANNOTATION_SOURCE}">"#)?;
    writeln!(
        xml,
        r#"      <details key="datastorePersistent" value="{}"/>"#,
        entity.datastore_persistent
    )?;
    writeln!(
        xml,
        r#"      <details key="datastoreCaching" value="{}"/>"#,
        entity.datastore_caching
    )?;
    if let Some(identity) = &entity.identity {
        writeln!(
            xml,
            r#"      <details key="identity" value="{}"/>"#,
            xml_escape(identity)
        )?;
    }
    writeln!(xml, r#"    </eAnnotations>"#)?;

    for attribute in &entity.attributes {
        write_attribute(xml, attribute)?;
    }

    // Owner sides declared by this entity, then bidirectional sides
    // materialized on it as the target.
    for association in &vocabulary.associations {
        if association.source == entity.name {
            write_reference(
                xml,
                &association.role,
                &association.target,
                association.many,
                association.mandatory,
                association
                    .opposite
                    .as_ref()
                    .map(|o| (association.target.as_str(), o.role.as_str())),
            )?;
        }
    }
    for association in &vocabulary.associations {
        if association.target == entity.name {
            if let Some(opposite) = &association.opposite {
                write_reference(
                    xml,
                    &opposite.role,
                    &opposite.target,
                    opposite.many,
                    opposite.mandatory,
                    Some((association.source.as_str(), association.role.as_str())),
                )?;
            }
        }
    }

    writeln!(xml, r#"  </eClassifiers>"#)?;
    Ok(())
}

fn write_attribute(xml: &mut String, attribute: &Attribute) -> Result<(), VocabError> {
    let name = xml_escape(&attribute.name);
    let transient_attr = match attribute.mode {
        AttributeMode::Default => "",
        AttributeMode::ExtendedTransient => r#" transient="true""#,
    };
    match &attribute.data_type {
        DataType::Custom(enum_name) => {
            // Enum-typed attribute: a local classifier reference.
            if attribute.mode == AttributeMode::ExtendedTransient {
                writeln!(
                    xml,
                    r##"    <eStructuralFeatures xsi:type="ecore:EAttribute" name="{}" eType="#//{}"{}>"##,
                    name,
                    xml_escape(enum_name),
                    transient_attr
                )?;
                write_mode_annotation(xml)?;
                writeln!(xml, r#"    </eStructuralFeatures>"#)?;
            } else {
                writeln!(
                    xml,
                    r##"    <eStructuralFeatures xsi:type="ecore:EAttribute" name="{}" eType="#//{}"/>"##,
                    name,
                    xml_escape(enum_name)
                )?;
            }
        }
        scalar => {
            writeln!(
                xml,
                r#"    <eStructuralFeatures xsi:type="ecore:EAttribute" name="{}"{}>"#,
                name, transient_attr
            )?;
            if attribute.mode == AttributeMode::ExtendedTransient {
                write_mode_annotation(xml)?;
            }
            writeln!(
                xml,
                r#"      <eType xsi:type="ecore:EDataType" href="http://www.eclipse.org/emf/2002/Ecore#//{}"/>"#,
                scalar_href(scalar)
            )?;
            writeln!(xml, r#"    </eStructuralFeatures>"#)?;
        }
    }
    Ok(())
}

fn write_mode_annotation(xml: &mut String) -> Result<(), VocabError> {
    writeln!(xml, r#"      <eAnnotations source="{ANNOTATION_SOURCE}">"#)?;
    writeln!(
        xml,
        r#"        <details key="mode" value="ExtendedTransient"/>"#
    )?;
    writeln!(xml, r#"      </eAnnotations>"#)?;
    Ok(())
}

fn write_reference(
    xml: &mut String,
    role: &str,
    target: &str,
    many: bool,
    mandatory: bool,
    opposite: Option<(&str, &str)>,
) -> Result<(), VocabError> {
    let mut attrs = String::new();
    if many {
        attrs.push_str(r#" upperBound="-1""#);
    }
    if mandatory {
        attrs.push_str(r#" lowerBound="1""#);
    }
    if let Some((opposite_class, opposite_role)) = opposite {
        write!(
            attrs,
            r##" eOpposite="#//{}/{}""##,
            xml_escape(opposite_class),
            xml_escape(opposite_role)
        )?;
    }
    writeln!(
        xml,
        r##"    <eStructuralFeatures xsi:type="ecore:EReference" name="{}" eType="#//{}"{}/>"##,
        xml_escape(role),
        xml_escape(target),
        attrs
    )?;
    Ok(())
}

fn scalar_href(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Integer => "ELong",
        DataType::Decimal => "EBigDecimal",
        DataType::String => "EString",
        DataType::Date => "EDate",
        DataType::Boolean => "EBoolean",
        DataType::Byte => "EByte",
        DataType::Custom(_) => unreachable!("custom data types reference local classifiers"),
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
