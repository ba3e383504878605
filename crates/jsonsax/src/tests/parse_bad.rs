use alloc::string::String;

use rstest::rstest;

use super::{for_each_context, skip_document};
use crate::{ErrorReason, Error};

fn parse_error(input: &[u8]) -> (ErrorReason, usize) {
    let [a, b, c] = for_each_context(input, |ctx| {
        match skip_document(ctx).expect_err("input should be rejected") {
            Error::Parse(err) => (err.reason(), err.offset()),
            other => panic!("unexpected error: {other}"),
        }
    });
    assert_eq!(a, b, "buffer contexts disagree");
    assert_eq!(a, c, "stream context disagrees");
    a
}

#[rstest]
#[case::missing_value(r#"{"a":}"#, ErrorReason::InvalidValue, 5)]
#[case::missing_colon(r#"{"a" 1}"#, ErrorReason::ExpectedColon, 5)]
#[case::trailing_comma_in_object(r#"{"a":1,}"#, ErrorReason::ExpectedOpeningQuote, 7)]
#[case::trailing_comma_in_array(r"[1,]", ErrorReason::InvalidValue, 3)]
#[case::missing_comma(r"[1 2]", ErrorReason::ExpectedCommaOrClosingBracket, 3)]
#[case::missing_comma_between_fields(r#"{"a":1 "b":2}"#, ErrorReason::ExpectedCommaOrClosingBracket, 7)]
#[case::unquoted_key(r"{1:2}", ErrorReason::ExpectedOpeningQuote, 1)]
#[case::mismatched_close(r#"{"a":1]"#, ErrorReason::ExpectedCommaOrClosingBracket, 6)]
#[case::close_in_value_position(r"[}", ErrorReason::InvalidValue, 1)]
#[case::unclosed_object(r"{", ErrorReason::ExpectedOpeningQuote, 0)]
#[case::unclosed_array(r"[", ErrorReason::UnterminatedValue, 0)]
#[case::unclosed_outer_array(r"[[1]", ErrorReason::ExpectedCommaOrClosingBracket, 3)]
#[case::unterminated_number(r"[1", ErrorReason::UnterminatedValue, 1)]
#[case::unterminated_string(r#"["abc"#, ErrorReason::ExpectedClosingQuote, 4)]
#[case::truncated_literal(r"[tru]", ErrorReason::InvalidValue, 4)]
#[case::hex_number(r"[0x10]", ErrorReason::InvalidValue, 5)]
#[case::nan(r"[NaN]", ErrorReason::InvalidValue, 4)]
#[case::overflowing_float(r"[1e400]", ErrorReason::InvalidValue, 6)]
#[case::underflowing_float(r"[1e-400]", ErrorReason::InvalidValue, 7)]
#[case::bad_escape(r#"["\q"]"#, ErrorReason::InvalidEscapeSequence, 3)]
#[case::bad_hex_digit(r#"["\u12G4"]"#, ErrorReason::InvalidUtf16Character, 6)]
#[case::lone_high_surrogate(r#"["\uD83D"]"#, ErrorReason::ExpectedUtf16LowSurrogate, 8)]
#[case::high_surrogate_then_escape(r#"["\uD83D\n"]"#, ErrorReason::ExpectedUtf16LowSurrogate, 9)]
#[case::high_surrogate_then_text(r#"["\uD83Dx"]"#, ErrorReason::ExpectedUtf16LowSurrogate, 8)]
#[case::lone_low_surrogate(r#"["\uDE00"]"#, ErrorReason::InvalidUtf16Character, 7)]
#[case::high_then_non_surrogate(r#"["\uD83D\u0041"]"#, ErrorReason::InvalidUtf16Character, 13)]
#[case::not_json(r"hello", ErrorReason::ExpectedOpeningBracket, 0)]
#[case::empty_input(r"", ErrorReason::ExpectedOpeningBracket, 0)]
#[case::whitespace_only(" \n ", ErrorReason::ExpectedOpeningBracket, 2)]
fn rejected(#[case] input: &str, #[case] reason: ErrorReason, #[case] offset: usize) {
    assert_eq!(parse_error(input.as_bytes()), (reason, offset), "{input}");
}

#[test]
fn nesting_deeper_than_the_default_limit() {
    let mut input = String::new();
    for _ in 0..40 {
        input.push_str(r#"{"k":"#);
    }
    let (reason, offset) = parse_error(input.as_bytes());
    assert_eq!(reason, ErrorReason::ExceededNestingLimit { limit: 32 });
    // The 34th `{` is the first one at level 33.
    assert_eq!(offset, 33 * 5);
}

#[test]
fn errors_inside_skipped_subtrees_are_reported() {
    let (reason, offset) = parse_error(br#"{"skipped": {"a": [1, 2 3]}}"#);
    assert_eq!(reason, ErrorReason::ExpectedCommaOrClosingBracket);
    assert_eq!(offset, 24);
}
