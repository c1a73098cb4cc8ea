include!("tests_setup.rs");

use hyper::StatusCode;
use listings_lib::services::search::resolve_filter;

#[test]
fn test_resolve_within_category() {
    let tree = create_property_tree();
    let params = QueryParams::parse("cat=PROP&min_rooms=2&max_area=90&heating=gas&limit=5&offset=5&fields=id");
    let resolved = resolve_filter(&tree, params).unwrap();

    assert_eq!(codes(&resolved.candidates), vec!["PROP", "APT", "HSE", "LND"]);
    assert_eq!(
        resolved.filter.categories,
        Some(vec!["PROP".to_string(), "APT".to_string(), "HSE".to_string(), "LND".to_string()])
    );
    assert_eq!(
        resolved.filter.attributes,
        vec![
            AttributePredicate::Range {
                key: "rooms".to_string(),
                bound: RangeBound::Min,
                value: AttributeValue::Number(2),
            },
            AttributePredicate::Range {
                key: "area".to_string(),
                bound: RangeBound::Max,
                value: AttributeValue::Number(90),
            },
        ]
    );
    // Heating is declared below PROP, so it is not part of its schema
    assert_eq!(resolved.ignored, vec!["heating".to_string()]);
}

#[test]
fn test_resolve_inherits_parent_attributes() {
    let tree = create_property_tree();
    let params = QueryParams::parse("cat=HSE&heating=gas&heating=oil&min_area=120");
    let resolved = resolve_filter(&tree, params).unwrap();

    assert_eq!(codes(&resolved.candidates), vec!["HSE"]);
    assert_eq!(
        resolved.filter.attributes,
        vec![
            AttributePredicate::OneOf {
                key: "heating".to_string(),
                values: vec![AttributeValue::Text("gas".to_string()), AttributeValue::Text("oil".to_string())],
            },
            AttributePredicate::Range {
                key: "area".to_string(),
                bound: RangeBound::Min,
                value: AttributeValue::Number(120),
            },
        ]
    );
    assert!(resolved.ignored.is_empty());
}

#[test]
fn test_resolve_without_category() {
    let tree = create_property_tree();
    let params = QueryParams::parse("text=sea&text=view&min_rooms=2&ex_cats=JOB");
    let resolved = resolve_filter(&tree, params).unwrap();

    assert_eq!(resolved.filter.text, Some("sea view".to_string()));
    assert_eq!(resolved.filter.categories, None);
    assert_eq!(resolved.filter.excluded_categories, vec!["JOB".to_string()]);
    assert!(resolved.filter.attributes.is_empty());
    assert_eq!(resolved.ignored, vec!["min_rooms".to_string()]);
    assert_eq!(codes(&resolved.candidates), vec!["APT", "HSE", "JOB", "LND", "PROP"]);
}

#[test]
fn test_resolve_unknown_category() {
    let tree = create_property_tree();
    let err = resolve_filter(&tree, QueryParams::parse("cat=BOAT")).unwrap_err();
    assert_eq!(error_response(&err).status, StatusCode::NotFound);
}

#[test]
fn test_resolve_cyclic_category() {
    let tree = CategoryTree::new(vec![category("A", "Alpha", Some("B")), category("B", "Beta", Some("A"))], vec![]);
    let err = resolve_filter(&tree, QueryParams::parse("cat=A")).unwrap_err();
    assert_eq!(error_response(&err).status, StatusCode::InternalServerError);
}
