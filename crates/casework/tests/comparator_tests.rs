//! Assertion failure messages as seen by a suite author

use casework::{
    expect_deep_eq, expect_eq, expect_eqf, expect_false, expect_panic_err_eq,
    expect_panic_err_eq_in, guard, raise, run_suite, stop_sub_test, suite, BinByte,
    FailureReport, Harness, HexByte, PanicError, ReportConfig, Reporter, TestContext,
    TwoHexBytes,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn test_failure_template_snapshot() {
    let mut t = Harness::new("template");
    expect_eq(&mut t, 5, 6, None);

    insta::assert_snapshot!(&t.failures()[0], @r"
    unexpected value:
        actual:   5
        expected: 6
    ");
}

#[test]
fn test_passing_assertions_record_nothing() {
    let mut t = Harness::new("quiet");
    expect_eq(&mut t, "same", "same", None);
    expect_eqf(&mut t, 7u8, 7u8, HexByte, None);
    expect_false(&mut t, 1 > 2, None);
    expect_deep_eq(&mut t, &Point { x: 1, y: 2 }, &Point { x: 1, y: 2 }, None);

    assert!(!t.failed());
}

#[rstest]
#[case::hex(expect_hex as fn(&mut Harness), "0xa", "0xb")]
#[case::two_hex(expect_two_hex as fn(&mut Harness), "0x0a", "0x0b")]
#[case::bin(expect_bin as fn(&mut Harness), "00001010", "00001011")]
fn test_expect_eqf_renders_both_sides(
    #[case] check: fn(&mut Harness),
    #[case] actual: &str,
    #[case] expected: &str,
) {
    let mut t = Harness::new("formats");
    check(&mut t);

    let rendered = FailureReport {
        message: "unexpected value".to_string(),
        actual: actual.to_string(),
        expected: expected.to_string(),
    };
    assert_eq!(t.failures(), [rendered.to_string()]);
}

fn expect_hex(t: &mut Harness) {
    expect_eqf(t, 10u8, 11u8, HexByte, None);
}

fn expect_two_hex(t: &mut Harness) {
    expect_eqf(t, 10u8, 11u8, TwoHexBytes, None);
}

fn expect_bin(t: &mut Harness) {
    expect_eqf(t, 10u8, 11u8, BinByte, None);
}

#[test]
fn test_closure_format() {
    let mut t = Harness::new("closure");
    expect_eqf(&mut t, 3, 4, |v: &i32| format!("#{}", v), Some("slot"));

    assert_eq!(t.failures(), ["slot:\n    actual:   #3\n    expected: #4"]);
}

#[test]
fn test_deep_eq_shows_types() {
    let mut t = Harness::new("deep");
    expect_deep_eq(&mut t, &vec![1, 2], &vec![1, 3], None);

    insta::assert_snapshot!(&t.failures()[0], @r"
    unexpected value:
        actual:   [1, 2] (alloc::vec::Vec<i32>)
        expected: [1, 3] (alloc::vec::Vec<i32>)
    ");
}

#[test]
fn test_deep_eq_different_types_never_equal() {
    let mut t = Harness::new("deep");
    expect_deep_eq(&mut t, &1u8, &1u16, Some("widths"));

    assert_eq!(
        t.failures(),
        ["widths:\n    actual:   1 (u8)\n    expected: 1 (u16)"]
    );
}

#[test]
fn test_deep_eq_keeps_nested_options_apart() {
    let mut t = Harness::new("deep");
    expect_deep_eq(&mut t, &Some(None::<u8>), &None::<Option<u8>>, None);

    insta::assert_snapshot!(&t.failures()[0], @r"
    unexpected value:
        actual:   Some(None) (core::option::Option<core::option::Option<u8>>)
        expected: None (core::option::Option<core::option::Option<u8>>)
    ");
}

#[test]
fn test_deep_eq_on_wide_ints_and_tuple_keys() {
    let mut t = Harness::new("deep");
    let table: HashMap<(u8, u8), &str> = [((0, 0), "origin"), ((1, 0), "east")]
        .into_iter()
        .collect();
    expect_deep_eq(&mut t, &table, &table.clone(), None);
    expect_deep_eq(&mut t, &u128::MAX, &u128::MAX, None);
    expect_deep_eq(&mut t, &Some(()), &Some(()), None);

    assert!(!t.failed(), "{:?}", t.failures());
}

#[test]
fn test_panic_err_eq_over_guarded_block() {
    let mut t = Harness::new("panics");
    expect_panic_err_eq_in(
        &mut t,
        || raise(PanicError::new("not found")),
        "not found",
        None,
    );
    assert!(!t.failed());

    expect_panic_err_eq_in(
        &mut t,
        || std::panic::panic_any(anyhow::anyhow!("disk full")),
        "disk full",
        None,
    );
    assert!(!t.failed());

    expect_panic_err_eq_in(&mut t, || raise("timed out"), "not found", Some("lookup"));
    assert_eq!(
        t.failures(),
        ["lookup:\n    actual:   timed out\n    expected: not found"]
    );
}

#[test]
fn test_panic_err_eq_without_error_payload() {
    let mut t = Harness::new("panics");
    let recovered = guard(|| panic!("plain text")).err();
    expect_panic_err_eq(&mut t, recovered.as_ref(), "not found", None);

    insta::assert_snapshot!(&t.failures()[0], @r"
    unexpected value (panic didn't return error):
        actual:   plain text
        expected: not found
    ");
}

struct Lookup;

impl Lookup {
    fn missing_key(&self, t: &mut dyn TestContext) {
        expect_panic_err_eq_in(
            t,
            || raise(PanicError::new("no such key")),
            "no such key",
            None,
        );
    }

    fn stop_inside_guard(&self, t: &mut dyn TestContext) {
        t.error("before".to_string());
        expect_panic_err_eq_in(t, || stop_sub_test(), "unused", None);
        t.error("not reached".to_string());
    }
}

suite!(Lookup {
    cases: [missing_key, stop_inside_guard],
});

#[test]
fn test_stop_passes_through_guarded_block() {
    let mut harness = Harness::new("lookup");
    run_suite(&mut harness, &Lookup);

    let reports = harness.into_reports();
    assert!(reports[0].is_pass());
    assert_eq!(reports[1].failures(), ["before"]);
}

#[test]
fn test_report_snapshot() {
    let mut harness = Harness::new("lookup");
    run_suite(&mut harness, &Lookup);
    let reports = harness.into_reports();

    let out = Reporter::new(ReportConfig::plain()).render("lookup", &reports, &[]);
    insta::assert_snapshot!(out, @r"
    PASS lookup/missing_key
    FAIL lookup/stop_inside_guard

    ──────────────────────────────────────────────────
    lookup result: FAILED | 2 total, 1 passed, 1 failed

    Failures:

      ● lookup/stop_inside_guard
          before
    ");
}
