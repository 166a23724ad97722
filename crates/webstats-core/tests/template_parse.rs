#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::borrow::Cow;

use webstats_core::error::ErrorCode;
use webstats_core::Template;

#[test]
fn placeholders_and_escaped_braces() {
    let tpl = Template::parse("a {{b}} {name} {count} {name}").unwrap();
    let names: Vec<&str> = tpl.placeholders().into_iter().collect();
    assert_eq!(names, vec!["count", "name"]);

    let out = tpl
        .render(|f| match f {
            "name" => Some(Cow::Borrowed("x")),
            "count" => Some(Cow::Owned(7.to_string())),
            _ => None,
        })
        .unwrap();
    assert_eq!(out, "a {b} x 7 x");
}

#[test]
fn malformed_templates_are_rejected() {
    for bad in ["{unterminated", "{}", "{bad name}", "lone } brace", "{a.b}"] {
        let err = Template::parse(bad).expect_err(bad);
        assert_eq!(err.code(), ErrorCode::TemplateUnavailable, "{bad}");
    }
}

#[test]
fn unresolved_field_fails_every_time() {
    let tpl = Template::parse("<b>{known}</b><i>{unknown}</i>").unwrap();
    for _ in 0..3 {
        let err = tpl
            .render(|f| (f == "known").then_some(Cow::Borrowed("k")))
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::MissingField);
        assert!(err.to_string().contains("unknown"));
    }
}

#[test]
fn ensure_fields_reports_first_unknown_name() {
    let tpl = Template::parse("{name} {threads} {io_writesdata}").unwrap();
    assert!(tpl.ensure_fields(&["name", "threads", "io_writesdata"]).is_ok());

    let err = tpl.ensure_fields(&["name", "threads"]).expect_err("must fail");
    assert_eq!(err.code(), ErrorCode::MissingField);
    assert!(err.to_string().contains("io_writesdata"));
}
