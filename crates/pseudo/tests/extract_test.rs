use pseudo::{extract, extract_document, Document, ExtractConfig, PseudoError, PseudoRegistry, Record};

const SAMPLE: &str = include_str!("fixtures/sample.html");

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn column(records: &[Record], name: &str) -> Vec<String> {
    records.iter().map(|r| r[name].clone()).collect()
}

#[test]
fn table_extract() {
    let config = ExtractConfig::new("table:first tr")
        .field("col1", "td:eq(0)")
        .field("col2", "td:eq(1)");

    let result = extract(SAMPLE, &config, None).unwrap();
    assert_eq!(
        result,
        vec![
            record(&[("col1", "row 1 - col 1"), ("col2", "row 1 - col 2")]),
            record(&[("col1", "row 2 - col 1"), ("col2", "row 2 - col 2")]),
        ]
    );
}

#[test]
fn extra_pseudo_extract() {
    let config = ExtractConfig::new("table:first:trs").field("col1", "td:eq(0)");
    let extra = PseudoRegistry::new().with("trs", |doc, q, _| Ok(q.find(doc, "tr")?));

    let result = extract(SAMPLE, &config, Some(&extra)).unwrap();
    assert_eq!(
        result,
        vec![
            record(&[("col1", "row 1 - col 1")]),
            record(&[("col1", "row 2 - col 1")]),
        ]
    );
}

#[test]
fn blank_cells_are_kept_by_default() {
    let config = ExtractConfig::new("#grouped tr").field("group", "td:eq(0)");
    let result = extract(SAMPLE, &config, None).unwrap();
    assert_eq!(column(&result, "group"), vec!["", "group 1", "", "group 2", ""]);
}

#[test]
fn repeat_if_blank() {
    let config = ExtractConfig::new("#grouped tr")
        .field("group", "td:eq(0)")
        .field("item", "td:eq(1)")
        .repeat_if_blank("group");

    let result = extract(SAMPLE, &config, None).unwrap();
    assert_eq!(
        column(&result, "group"),
        vec!["", "group 1", "group 1", "group 2", "group 2"]
    );
    assert_eq!(column(&result, "item"), vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn skip_if_blank() {
    let config = ExtractConfig::new("#grouped tr")
        .field("group", "td:eq(0)")
        .field("item", "td:eq(1)")
        .skip_if_blank("group");

    let result = extract(SAMPLE, &config, None).unwrap();
    assert_eq!(column(&result, "item"), vec!["b", "d"]);
}

#[test]
fn repeat_runs_before_skip() {
    let config = ExtractConfig::new("#grouped tr")
        .field("group", "td:eq(0)")
        .field("item", "td:eq(1)")
        .repeat_if_blank("group")
        .skip_if_blank("group");

    let result = extract(SAMPLE, &config, None).unwrap();
    assert_eq!(column(&result, "item"), vec!["b", "c", "d", "e"]);
}

#[test]
fn json_config() {
    let config = ExtractConfig::from_json(
        r##"{
            "rows": "#grouped tr:slice(1,3)",
            "fields": {"item": "td:last", "group": "td:first"}
        }"##,
    )
    .unwrap();

    let doc = Document::parse(SAMPLE);
    let result = extract_document(&doc, &config, None).unwrap();
    assert_eq!(
        result,
        vec![
            record(&[("item", "b"), ("group", "group 1")]),
            record(&[("item", "c"), ("group", "")]),
        ]
    );
}

#[test]
fn no_rows_gives_no_records() {
    let config = ExtractConfig::new("table#missing tr").field("col1", "td:eq(0)");
    assert!(extract(SAMPLE, &config, None).unwrap().is_empty());
}

#[test]
fn interpreter_errors_propagate() {
    let config = ExtractConfig::new("table:first tr").field("col1", "td:nope");
    let err = extract(SAMPLE, &config, None).unwrap_err();
    assert!(matches!(err, PseudoError::UnknownPseudo { .. }));

    let config = ExtractConfig::new(":first tr").field("col1", "td");
    let err = extract(SAMPLE, &config, None).unwrap_err();
    assert!(matches!(err, PseudoError::MissingContext { .. }));

    let config = ExtractConfig::new("tr").field("col1", "td:closest(#main table)");
    let err = extract(SAMPLE, &config, None).unwrap_err();
    assert!(matches!(err, PseudoError::Syntax(_)));
}
