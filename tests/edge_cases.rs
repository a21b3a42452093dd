use drl::{
    AttrValue, Attribute, AttributeSpec, CompareOp, ConstraintKind, ConstraintSpec, Dimension,
    Expr, ItemContext, LayerTable, ParseErrorKind, ParseOptions, Quantity, ValueKind, Vocabulary,
    attr, parse, parse_with,
};

fn layers() -> LayerTable {
    LayerTable::standard(2)
}

#[test]
fn header_only_file() {
    let model = parse("version 20200610", &layers()).unwrap();
    assert!(model.is_empty());
    assert!(!model.is_too_recent());
}

#[test]
fn comments_and_blank_lines_everywhere() {
    let src = "# leading comment\n\n\
               version 20200610 # trailing\n\
               # between items\n\
               RULE \"r\" # after name\n\
               {\n\
                 # inside body\n\
                 clearance 0.2mm # after value\n\
               }\n\
               # at end";
    let model = parse(src, &layers()).unwrap();
    assert_eq!(model.rules().len(), 1);
}

#[test]
fn crlf_line_endings() {
    let src = "version 20200610\r\nRULE \"r\" {\r\n  clearance 1mm\r\n}\r\n";
    let model = parse(src, &layers()).unwrap();
    assert_eq!(model.rules()[0].constraints[0].params[0], Dimension::length_nm(1_000_000));
}

#[test]
fn crlf_error_lines_are_counted() {
    let src = "version 20200610\r\n\r\nRULE \"r\" { wiggle 1mm }";
    let err = parse(src, &layers()).unwrap_err();
    assert_eq!(err.line(), 3);
}

#[test]
fn names_may_look_like_keywords() {
    let src = "version 1\n\
               CONDITION \"RULE\" { true }\n\
               RULE \"CONDITION\" CONDITION \"RULE\" { clearance 1mm }";
    let model = parse(src, &layers()).unwrap();
    assert_eq!(model.conditions()[0].name, "RULE");
    assert_eq!(model.rules()[0].name, "CONDITION");
}

#[test]
fn escaped_quotes_in_names() {
    let src = "version 1\nRULE \"say \\\"hi\\\"\" { clearance 1mm }";
    let model = parse(src, &layers()).unwrap();
    assert_eq!(model.rules()[0].name, "say \"hi\"");
}

#[test]
fn unicode_in_strings() {
    let src = "version 1\nCONDITION \"µ-pitch\" { net == \"Ω_sense\" }";
    let model = parse(src, &layers()).unwrap();
    assert_eq!(model.conditions()[0].expr, attr(Attribute::Net).eq("Ω_sense"));
}

#[test]
fn columns_count_characters_not_bytes() {
    let src = "version 1\nCONDITION \"µµ\" { bogus == 1 }";
    let err = parse(src, &layers()).unwrap_err();
    // "CONDITION "µµ" { " is 17 characters.
    assert_eq!((err.line(), err.column()), (2, 18));
}

#[test]
fn lowercase_keywords_are_not_keywords() {
    let err = parse("version 1\nrule \"r\" { clearance 1mm }", &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Syntax { .. }));
}

#[test]
fn version_must_come_first() {
    let err = parse("# comment\nRULE \"r\" { clearance 1mm }\nversion 1", &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Format { .. }));
    assert_eq!(err.line(), 2);
}

#[test]
fn second_version_header_is_syntax_error() {
    let err = parse("version 1\nversion 2", &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Syntax { .. }));
}

#[test]
fn unterminated_string_aborts() {
    let err = parse("version 1\nRULE \"r { clearance 1mm }", &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Lexical { .. }));
    assert_eq!((err.line(), err.column()), (2, 6));
}

#[test]
fn stray_symbol_aborts() {
    let err = parse("version 1\nRULE \"r\" { clearance 1mm; }", &layers()).unwrap_err();
    match err.kind() {
        ParseErrorKind::Lexical { text, .. } => assert_eq!(text, ";"),
        other => panic!("expected lexical error, got {other:?}"),
    }
}

#[test]
fn number_without_space_before_comma() {
    let model = parse(
        "version 1\nRULE \"r\" { track_width 0.1mm,0.3mm }",
        &layers(),
    )
    .unwrap();
    assert_eq!(
        model.rules()[0].constraints[0].max(),
        Some(Dimension::length_nm(300_000))
    );
}

#[test]
fn whitespace_between_number_and_unit_is_missing_unit() {
    let err = parse("version 1\nRULE \"r\" { clearance 5 mm }", &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Unit { suffix: None, .. }));
}

#[test]
fn unit_case_matters() {
    let err = parse("version 1\nRULE \"r\" { clearance 5MM }", &layers()).unwrap_err();
    assert!(matches!(
        err.kind(),
        ParseErrorKind::Unit { suffix: Some(s), .. } if s == "MM"
    ));
}

#[test]
fn angle_where_length_expected() {
    let err = parse("version 1\nRULE \"r\" { clearance 45deg }", &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Unit { .. }));
}

#[test]
fn overflowing_length() {
    let err = parse("version 1\nRULE \"r\" { clearance 1000000000000in }", &layers())
        .unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Unit { .. }));
}

#[test]
fn count_rejects_units_and_fractions() {
    for value in ["2mm", "2.5"] {
        let src = format!("version 1\nRULE \"r\" {{ via_count {value} }}");
        let err = parse(&src, &layers()).unwrap_err();
        assert!(matches!(err.kind(), ParseErrorKind::Syntax { .. }), "{value}");
    }
}

#[test]
fn constant_conditions() {
    let model = parse(
        "version 1\nCONDITION \"always\" { true }\nCONDITION \"never\" { NOT true }",
        &layers(),
    )
    .unwrap();
    assert_eq!(model.conditions()[0].expr, Expr::Literal(true));
    assert_eq!(model.conditions()[1].expr, !Expr::Literal(true));
}

#[test]
fn empty_condition_body() {
    let err = parse("version 1\nCONDITION \"c\" { }", &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Syntax { .. }));
}

#[test]
fn dangling_operator() {
    let err = parse("version 1\nCONDITION \"c\" { width > }", &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Syntax { .. }));
}

#[test]
fn trailing_comma_in_condition_list() {
    let src = "version 1\nCONDITION \"a\" { true }\nRULE \"r\" CONDITION \"a\", { clearance 1mm }";
    let err = parse(src, &layers()).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Syntax { .. }));
}

#[test]
fn custom_vocabulary() {
    let vocabulary = Vocabulary::standard()
        .with_constraint(
            "min_gap",
            ConstraintSpec::new(ConstraintKind::Clearance, &[Quantity::Length], 1),
        )
        .with_attribute(
            "class",
            AttributeSpec::new(Attribute::NetClass, ValueKind::Text, &CompareOp::EQUALITY),
        );
    let options = ParseOptions::new().vocabulary(vocabulary);
    let model = parse_with(
        "version 1\nCONDITION \"c\" { class == HV }\nRULE \"r\" CONDITION \"c\" { min_gap 3mm }",
        &layers(),
        &options,
    )
    .unwrap();
    assert_eq!(model.conditions()[0].expr, attr(Attribute::NetClass).eq("HV"));
    assert_eq!(
        model.rules()[0].constraint(ConstraintKind::Clearance).unwrap().value(),
        Some(Dimension::length_nm(3_000_000))
    );
}

#[test]
fn empty_vocabulary_rejects_everything() {
    let options = ParseOptions::new().vocabulary(Vocabulary::empty());
    let err = parse_with("version 1\nRULE \"r\" { clearance 1mm }", &layers(), &options)
        .unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::Syntax { .. }));
}

#[test]
fn negative_width_literal() {
    let model = parse("version 1\nCONDITION \"c\" { width >= -1mil }", &layers()).unwrap();
    assert_eq!(
        model.conditions()[0].expr,
        attr(Attribute::Width).gte(AttrValue::Length(-25_400))
    );
}

#[test]
fn many_rules() {
    let mut src = String::from("version 1\n");
    for i in 0..500 {
        src.push_str(&format!("RULE \"r{i}\" {{ clearance {i}um }}\n"));
    }
    let model = parse(&src, &layers()).unwrap();
    assert_eq!(model.rules().len(), 500);
    assert_eq!(
        model.rule("r499").unwrap().constraints[0].params[0],
        Dimension::length_nm(499_000)
    );
}

#[test]
fn long_or_chain_parses_evaluates_and_drops() {
    let terms = 100_000;
    let mut body = "netclass == N0".to_owned();
    for i in 1..terms {
        body.push_str(&format!(" OR netclass == N{i}"));
    }
    let src = format!(
        "version 20200610\n\
         CONDITION \"any\" {{ {body} }}\n\
         RULE \"r\" CONDITION \"any\" {{ clearance 1mm }}"
    );
    let model = parse(&src, &layers()).unwrap();

    match &model.conditions()[0].expr {
        Expr::Or(operands) => assert_eq!(operands.len(), terms),
        other => panic!("expected a flat OR chain, got {}", other),
    }

    let id = model.condition_id("any").unwrap();
    let last = ItemContext::new().set(Attribute::NetClass, format!("N{}", terms - 1));
    assert_eq!(model.condition_matches(id, &last), Some(true));
    let other = ItemContext::new().set(Attribute::NetClass, "GND");
    assert_eq!(model.condition_matches(id, &other), Some(false));
    assert_eq!(model.applicable_rules(&last).count(), 1);

    let copy = model.conditions()[0].clone();
    assert_eq!(copy, model.conditions()[0]);
    assert!(copy.expr.to_string().ends_with(&format!("N{}\"))", terms - 1)));
    drop(copy);
    drop(model);
}

#[test]
fn long_and_of_parenthesized_ors_stays_shallow() {
    let groups = 50_000;
    let body = vec!["(true OR false)"; groups].join(" AND ");
    let src = format!("version 20200610\nCONDITION \"c\" {{ {body} AND NOT false }}");
    let model = parse(&src, &layers()).unwrap();

    match &model.conditions()[0].expr {
        Expr::And(operands) => {
            assert_eq!(operands.len(), groups + 1);
            assert!(matches!(&operands[0], Expr::Or(inner) if inner.len() == 2));
        }
        other => panic!("expected a flat AND chain, got {}", other),
    }
    let id = model.condition_id("c").unwrap();
    assert_eq!(model.condition_matches(id, &ItemContext::new()), Some(true));
}

#[test]
fn literals_longer_than_an_i64_mantissa() {
    let src = "version 20200610\nRULE \"r\" { clearance 0.12345678901234567890mm }";
    let model = parse(src, &layers()).unwrap();
    assert_eq!(
        model.rules()[0].constraints[0].params[0],
        Dimension::length_nm(123_457)
    );
}
