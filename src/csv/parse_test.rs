use super::*;

#[test]
fn header_only_or_empty_input_has_no_rows() {
    assert!(parse_csv("").is_empty());
    assert!(parse_csv("   \n  ").is_empty());
    assert!(parse_csv("Name,Address").is_empty());
}

#[test]
fn parses_rows_keyed_by_header() {
    let rows = parse_csv("Driver ID,Full Name,Current Status\nDRV001,Ana Ruiz,Available\nDRV002,Ben Ode,Busy\n");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("Driver ID"), Some("DRV001"));
    assert_eq!(rows[0].get("Full Name"), Some("Ana Ruiz"));
    assert_eq!(rows[1].get("Current Status"), Some("Busy"));
    assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["Driver ID", "Full Name", "Current Status"]);
}

#[test]
fn strips_quotes_and_whitespace() {
    let rows = parse_csv("\"Name\" , \"Borough\"\r\n \"Suds Shop\" ,\"Queens\"\r\n");
    assert_eq!(rows[0].get("Name"), Some("Suds Shop"));
    assert_eq!(rows[0].get("Borough"), Some("Queens"));
}

#[test]
fn missing_and_empty_values_are_none() {
    let rows = parse_csv("a,b,c\n1,,\n2");
    assert_eq!(rows[0].get("a"), Some("1"));
    assert_eq!(rows[0].get("b"), None);
    assert_eq!(rows[0].get("c"), None);
    assert!(rows[1].has_column("c"));
    assert_eq!(rows[1].get("c"), None);
}

#[test]
fn quoted_commas_split_the_field() {
    // Known limitation: no quoting support.
    let rows = parse_csv("Name,Address\nWash Co,\"12 Main St, Brooklyn\"");
    assert_eq!(rows[0].get("Address"), Some("12 Main St"));
    assert_eq!(rows[0].len(), 2);
}

#[test]
fn blank_interior_lines_become_empty_rows() {
    let rows = parse_csv("id,name\n1,a\n\n2,b");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].get("id"), None);
    assert_eq!(rows[1].get("name"), None);
    assert!(rows[1].has_column("name"));
    assert_eq!(rows[2].get("id"), Some("2"));
}

#[test]
fn repeated_header_keeps_last_value() {
    let rows = parse_csv("x,x\n1,2");
    assert_eq!(rows[0].len(), 1);
    assert_eq!(rows[0].get("x"), Some("2"));
}

#[test]
fn numeric_accessors_use_leading_prefix() {
    let rows = parse_csv("Rating,Stock,Price\n4.5 stars,12 units,abc");
    assert_eq!(rows[0].float("Rating"), Some(4.5));
    assert_eq!(rows[0].int("Stock"), Some(12));
    assert_eq!(rows[0].float("Price"), None);
    assert_eq!(rows[0].int("Missing"), None);
}

#[test]
fn int_prefix_edge_cases() {
    assert_eq!(parse_int_prefix("3.7"), Some(3));
    assert_eq!(parse_int_prefix("  -42x"), Some(-42));
    assert_eq!(parse_int_prefix("+"), None);
    assert_eq!(parse_int_prefix(""), None);
}

#[test]
fn float_prefix_edge_cases() {
    assert_eq!(parse_float_prefix(".5"), Some(0.5));
    assert_eq!(parse_float_prefix("5."), Some(5.0));
    assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
    assert_eq!(parse_float_prefix("2e"), Some(2.0));
    assert_eq!(parse_float_prefix("-0.25%"), Some(-0.25));
    assert_eq!(parse_float_prefix("."), None);
    assert_eq!(parse_float_prefix("$3"), None);
}

#[test]
fn first_text_prefers_earlier_spelling() {
    let rows = parse_csv("status,Status\n,Pending");
    assert_eq!(rows[0].first_text(&["status", "Status"]), Some("Pending"));
    assert_eq!(rows[0].first_text(&["nope"]), None);
}

#[test]
fn row_serializes_as_ordered_object() {
    let rows = parse_csv("b,a\n1,");
    let json = serde_json::to_string(&rows[0]).unwrap();
    assert_eq!(json, r#"{"b":"1","a":null}"#);
}
