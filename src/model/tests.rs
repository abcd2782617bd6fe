//! Tests for the definition model and its XML loader.

use super::*;

const DEFINITIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<oval_definitions xmlns="http://oval.mitre.org/XMLSchema/oval-definitions-5"
                  xmlns:unix="http://oval.mitre.org/XMLSchema/oval-definitions-5#unix">
  <definitions>
    <definition id="oval:org.test:def:1" version="2" class="compliance">
      <metadata>
        <title> Root login disabled </title>
      </metadata>
      <criteria operator="OR">
        <criterion test_ref="oval:org.test:tst:1" negate="true"/>
        <extend_definition definition_ref="oval:org.test:def:2"/>
        <note>ignored</note>
      </criteria>
    </definition>
    <definition id="oval:org.test:def:2" version="1" class="inventory">
      <criteria>
        <criterion test_ref="oval:org.test:tst:2"/>
      </criteria>
    </definition>
  </definitions>
  <tests>
    <unix:password_test id="oval:org.test:tst:1" version="3" comment="root has password"/>
    <unix:shadow_test id="oval:org.test:tst:2" version="1"/>
  </tests>
</oval_definitions>"#;

#[test]
fn test_load_definitions_document() {
    let model = DefinitionModel::from_xml(DEFINITIONS).unwrap();

    assert_eq!(model.definitions().len(), 2);
    assert_eq!(model.tests().len(), 2);

    let test = model.test("oval:org.test:tst:1").unwrap();
    assert_eq!(test.version, 3);
    assert_eq!(test.kind, "password_test");
    assert_eq!(test.comment.as_deref(), Some("root has password"));

    let def = model.definition("oval:org.test:def:1").unwrap();
    assert_eq!(def.version, 2);
    assert_eq!(def.class.as_deref(), Some("compliance"));
    assert_eq!(def.title.as_deref(), Some("Root login disabled"));

    let criteria = def.criteria.as_ref().unwrap();
    match &criteria.kind {
        TemplateKind::Criteria { operator, children } => {
            assert_eq!(*operator, Operator::Or);
            // <note> is skipped
            assert_eq!(children.len(), 2);
            assert!(children[0].negate);
            assert_eq!(
                children[1],
                TemplateNode::extend_definition("oval:org.test:def:2")
            );
        }
        other => panic!("expected criteria, got {:?}", other),
    }
}

#[test]
fn test_operator_defaults_to_and() {
    let model = DefinitionModel::from_xml(DEFINITIONS).unwrap();
    let def = model.definition("oval:org.test:def:2").unwrap();
    assert!(matches!(
        def.criteria.as_ref().unwrap().kind,
        TemplateKind::Criteria { operator: Operator::And, .. }
    ));
}

#[test]
fn test_missing_id_is_an_error() {
    let xml = r#"<oval_definitions><tests><file_test version="1"/></tests></oval_definitions>"#;
    let err = DefinitionModel::from_xml(xml).unwrap_err();
    assert!(err.to_string().contains("'id'"));
}

#[test]
fn test_malformed_xml_is_an_error() {
    let err = DefinitionModel::from_xml("<oval_definitions>").unwrap_err();
    assert!(err.is_xml());
}

#[test]
fn test_foreign_namespace_is_rejected() {
    let xml = r#"<oval_results xmlns="http://oval.mitre.org/XMLSchema/oval-results-5"/>"#;
    let err = DefinitionModel::from_xml(xml).unwrap_err();
    assert!(err.is_xml());
    assert!(err.to_string().contains(crate::xml::DEFINITIONS_NAMESPACE));

    // unqualified documents are still accepted
    let model = DefinitionModel::from_xml("<oval_definitions/>").unwrap();
    assert!(model.definitions().is_empty());
}

#[test]
fn test_duplicate_ids_keep_last() {
    let model = DefinitionModel::new()
        .with_test(TestTemplate::new("t", 1))
        .with_test(TestTemplate::new("t", 2));
    assert_eq!(model.tests().len(), 1);
    assert_eq!(model.test("t").unwrap().version, 2);
}
