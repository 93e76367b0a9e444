use rstest::rstest;
use xson::{
    CapacityPolicy, ConversionError, Document, EscapeMode, NodeType, ParserOptions, QueryError,
};

#[rstest]
#[case("[1]", Ok(20))]
#[case("[0]", Ok(10))]
#[case("[3]", Err(QueryError::IndexOutOfRange { index: 3, len: 3 }))]
#[case("[-1]", Err(QueryError::InvalidExpression("[-1]".to_string())))]
#[case("[1x]", Err(QueryError::InvalidExpression("[1x]".to_string())))]
#[case(
    "[18446744073709551616]",
    Err(QueryError::IndexOutOfRange { index: usize::MAX, len: 3 })
)]
fn array_indexing(#[case] expr: &str, #[case] expected: Result<i64, QueryError>) {
    let doc = Document::parse("[10,20,30]").unwrap();
    assert_eq!(doc.get_integer(expr), expected);
}

#[test]
fn nested_path() {
    let doc = Document::parse(r#"{"a":{"b":[{"c":5}]}}"#).unwrap();
    assert_eq!(doc.get_integer("a.b[0].c"), Ok(5));
    assert_eq!(doc.get_array_size("a.b"), Ok(1));
    assert_eq!(doc.get_object_size("a.b[0]"), Ok(1));
}

/// Duplicate keys are kept: both pairs stay in the object (they are counted and
/// rendered), but a lookup by key always finds the last one.
#[test]
fn duplicate_keys_last_one_wins() {
    let doc = Document::parse(r#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(doc.get_integer("a"), Ok(2));
    assert_eq!(doc.get_object_size(""), Ok(2));
    let keys: Vec<_> = doc
        .value()
        .children()
        .map(|pair| pair.key().unwrap().as_str().unwrap())
        .collect();
    assert_eq!(keys, ["a", "a"]);
    assert_eq!(doc.render(0), "{\n\"a\": 1,\n\"a\": 2\n}\n");
}

#[rstest]
#[case("0", 0.0)]
#[case("-0", -0.0)]
#[case("9007199254740993", 9007199254740992.0)]
#[case("-9223372036854775808", -9223372036854775808.0)]
#[case("18446744073709551615", 18446744073709551615.0)]
#[case("2.5e-3", 0.0025)]
fn numeric_accessors_match_std_parsing(#[case] text: &str, #[case] as_f64: f64) {
    let doc = Document::parse(&format!("[{text}]")).unwrap();
    assert_eq!(doc.get_integer("[0]").ok(), text.parse::<i64>().ok());
    assert_eq!(
        doc.get_unsigned("[0]").ok(),
        text.parse::<u64>().ok().or((text == "-0").then_some(0))
    );
    assert_eq!(doc.get_double("[0]"), Ok(as_f64));
    assert_eq!(doc.get_double("[0]").ok(), text.parse::<f64>().ok());
}

#[rstest]
#[case::i64_overflow("99999999999999999999")]
#[case::i64_underflow("-99999999999999999999")]
fn integer_overflow_is_out_of_range(#[case] text: &str) {
    let doc = Document::parse(&format!("[{text}]")).unwrap();
    assert!(matches!(
        doc.get_integer("[0]"),
        Err(QueryError::Conversion(ConversionError::OutOfRange { .. }))
    ));
}

#[test]
fn unsigned_rules() {
    let doc = Document::parse("[99999999999999999999, -5, 1.5, -0]").unwrap();
    assert!(matches!(
        doc.get_unsigned("[0]"),
        Err(QueryError::Conversion(ConversionError::OutOfRange { target: "u64", .. }))
    ));
    assert!(matches!(
        doc.get_unsigned("[1]"),
        Err(QueryError::Conversion(ConversionError::OutOfRange { .. }))
    ));
    assert!(matches!(
        doc.get_unsigned("[2]"),
        Err(QueryError::Conversion(ConversionError::Malformed { .. }))
    ));
    assert_eq!(doc.get_unsigned("[3]"), Ok(0));
}

#[test]
fn double_overflow_is_out_of_range() {
    let doc = Document::parse("[1e999, -1e999, 1e-999]").unwrap();
    assert!(matches!(
        doc.get_double("[0]"),
        Err(QueryError::Conversion(ConversionError::OutOfRange { .. }))
    ));
    assert!(matches!(
        doc.get_double("[1]"),
        Err(QueryError::Conversion(ConversionError::OutOfRange { .. }))
    ));
    assert_eq!(doc.get_double("[2]"), Ok(0.0));
}

#[test]
fn narrow_numbers() {
    let doc = Document::parse(r#"{"small": 100, "big": 70000, "neg": -129}"#).unwrap();
    assert_eq!(doc.get_number::<i8>("small"), Ok(100));
    assert_eq!(doc.get_number::<u16>("small"), Ok(100));
    assert_eq!(doc.get_number::<u32>("big"), Ok(70000));
    assert!(doc.get_number::<u16>("big").is_err());
    assert!(doc.get_number::<i8>("neg").is_err());
    assert_eq!(doc.get_number::<i16>("neg"), Ok(-129));
    assert_eq!(doc.get_number::<f32>("big"), Ok(70000.0));
}

#[test]
fn unicode_escape_is_kept_raw_by_default() {
    let text = r#"{"s": "\u0041"}"#;
    let doc = Document::parse(text).unwrap();
    assert_eq!(doc.get_string("s", 16).as_deref(), Ok("\\u0041"));

    let options = ParserOptions {
        escapes: EscapeMode::Decode,
        ..Default::default()
    };
    let doc = Document::parse_with_options(text, options).unwrap();
    assert_eq!(doc.get_string("s", 16).as_deref(), Ok("A"));
}

#[test]
fn lone_surrogate_fails_to_decode() {
    let text = r#"["\uD800"]"#;
    let options = ParserOptions {
        escapes: EscapeMode::Decode,
        ..Default::default()
    };
    let doc = Document::parse_with_options(text, options).unwrap();
    assert!(matches!(
        doc.get_string("[0]", 16),
        Err(QueryError::Conversion(ConversionError::Escape(_)))
    ));
    // The raw view is still there.
    assert_eq!(doc.value().element(0).unwrap().as_str(), Some("\\uD800"));
}

#[test]
fn keys_are_matched_raw() {
    let text = r#"{"\u0061": 1, "a": 2}"#;
    let doc = Document::parse(text).unwrap();
    assert_eq!(doc.get_integer("a"), Ok(2));
    assert_eq!(doc.get_integer("\\u0061"), Ok(1));
    assert_eq!(doc.get_object_size(""), Ok(2));
}

#[test]
fn string_capacity_policies() {
    let text = r#"{"name": "abcdef"}"#;
    let doc = Document::parse(text).unwrap();
    assert_eq!(
        doc.get_string("name", 4),
        Err(QueryError::CapacityExceeded {
            needed: 6,
            capacity: 4
        })
    );
    let options = ParserOptions {
        capacity_policy: CapacityPolicy::Truncate,
        ..Default::default()
    };
    let doc = Document::parse_with_options(text, options).unwrap();
    assert_eq!(doc.get_string("name", 4).as_deref(), Ok("abcd"));
}

#[rstest]
#[case("n.x", QueryError::NullTarget)]
#[case("n[0]", QueryError::TypeMismatch { expected: "array", found: NodeType::Null })]
#[case("b.x", QueryError::OperationNotSupported(NodeType::Bool))]
#[case("s.x", QueryError::OperationNotSupported(NodeType::String))]
#[case("i.x", QueryError::OperationNotSupported(NodeType::Number))]
#[case("missing", QueryError::KeyNotFound("missing".to_string()))]
#[case("arr.x", QueryError::InvalidExpression("x".to_string()))]
#[case("arr[2]", QueryError::IndexOutOfRange { index: 2, len: 1 })]
#[case("obj[0]", QueryError::TypeMismatch { expected: "array", found: NodeType::Object })]
#[case(".", QueryError::InvalidExpression(String::new()))]
#[case("obj.", QueryError::InvalidExpression(String::new()))]
fn evaluation_errors(#[case] expr: &str, #[case] expected: QueryError) {
    let doc = Document::parse(
        r#"{"n": null, "b": true, "s": "x", "i": 1, "arr": [0], "obj": {}}"#,
    )
    .unwrap();
    assert_eq!(doc.evaluate(expr).unwrap_err(), expected);
}

#[test]
fn typed_accessor_mismatches() {
    let doc = Document::parse(r#"{"s": "1.5", "n": 1.5, "t": true}"#).unwrap();
    assert_eq!(
        doc.get_double("s"),
        Err(QueryError::TypeMismatch {
            expected: "number",
            found: NodeType::String
        })
    );
    assert_eq!(
        doc.get_string("n", 8),
        Err(QueryError::TypeMismatch {
            expected: "string",
            found: NodeType::Number
        })
    );
    assert_eq!(
        doc.get_integer("t"),
        Err(QueryError::TypeMismatch {
            expected: "number",
            found: NodeType::Bool
        })
    );
    assert_eq!(
        doc.get_object_size("t"),
        Err(QueryError::TypeMismatch {
            expected: "object",
            found: NodeType::Bool
        })
    );
}

#[test]
fn evaluation_from_inner_nodes() {
    let doc = Document::parse(r#"{"outer": {"inner": [{"v": 1}, {"v": 2}]}}"#).unwrap();
    let inner = doc.evaluate("outer.inner").unwrap();
    assert_eq!(inner.evaluate("[1].v").unwrap().as_number_text(), Some("2"));
    assert_eq!(inner.element(0).unwrap().get("v").unwrap().to_number::<i64>(), Ok(1));
    assert_eq!(inner.parent().unwrap().node_type(), NodeType::Pair);
}
