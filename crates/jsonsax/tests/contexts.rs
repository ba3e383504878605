#![expect(missing_docs)]
#![allow(clippy::float_cmp)]

mod common;

use common::{DOCUMENT, Kind};
use jsonsax::{
    ANY, BufferContext, ConstBufferContext, Context, ErrorReason, JsonPath, ParserOptions,
    StreamContext, ValueKind, parse_object, walk,
};
use rstest::rstest;

fn with_context<T>(
    kind: Kind,
    input: &[u8],
    options: ParserOptions,
    f: impl FnOnce(&mut dyn Context) -> T,
) -> T {
    match kind {
        Kind::InPlace => {
            let mut buffer = input.to_vec();
            f(&mut BufferContext::with_options(&mut buffer, options))
        }
        Kind::Const => f(&mut ConstBufferContext::with_options(input, options)),
        Kind::Stream => f(&mut StreamContext::with_options(
            input.iter().copied(),
            options,
        )),
    }
}

#[derive(Debug, PartialEq)]
enum Scalar {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

fn flatten(value: &serde_json::Value, path: &mut JsonPath, out: &mut Vec<(String, Scalar)>) {
    let scalar = match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                path.push(key.as_str().into());
                flatten(child, path, out);
                path.pop();
            }
            return;
        }
        serde_json::Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(index.into());
                flatten(child, path, out);
                path.pop();
            }
            return;
        }
        serde_json::Value::String(s) => Scalar::Str(s.clone()),
        serde_json::Value::Number(n) => Scalar::Num(n.as_f64().unwrap()),
        serde_json::Value::Bool(b) => Scalar::Bool(*b),
        serde_json::Value::Null => Scalar::Null,
    };
    out.push((path.to_string(), scalar));
}

#[rstest]
fn walk_agrees_with_serde_json(#[values(Kind::InPlace, Kind::Const, Kind::Stream)] kind: Kind) {
    let expected = {
        let value: serde_json::Value = serde_json::from_str(DOCUMENT).unwrap();
        let mut out = Vec::new();
        flatten(&value, &mut JsonPath::new(), &mut out);
        out
    };

    let got = with_context(kind, DOCUMENT.as_bytes(), ParserOptions::default(), |ctx| {
        let mut out = Vec::new();
        walk(ctx, |path, value| {
            let scalar = match value.kind() {
                ValueKind::String => Scalar::Str(value.as_str().unwrap().to_owned()),
                ValueKind::Number => Scalar::Num(value.as_float()),
                ValueKind::Boolean => Scalar::Bool(value.as_boolean()),
                _ => Scalar::Null,
            };
            out.push((path.to_string(), scalar));
            Ok(())
        })
        .unwrap();
        out
    });

    assert_eq!(got, expected);
}

#[derive(Debug, Default, PartialEq)]
struct Request {
    filename: String,
    opt_level: i64,
    features: Vec<String>,
}

#[rstest]
fn typed_extraction(#[values(Kind::InPlace, Kind::Const, Kind::Stream)] kind: Kind) {
    let request = with_context(kind, DOCUMENT.as_bytes(), ParserOptions::default(), |ctx| {
        let mut request = Request::default();
        parse_object(ctx, |field| {
            field
                .dispatch()
                .on("request", |f| {
                    f.parse_object(|f| {
                        f.dispatch()
                            .on("filename", |f| {
                                request.filename = f.value().as_string().to_string();
                                Ok(())
                            })
                            .on("options", |f| {
                                f.parse_object(|f| {
                                    f.dispatch()
                                        .on("opt_level", |f| {
                                            request.opt_level = f.value().as_integer();
                                            Ok(())
                                        })
                                        .on("features", |f| {
                                            f.parse_array(|e| {
                                                request
                                                    .features
                                                    .push(e.value().as_string().to_string());
                                                Ok(())
                                            })
                                        })
                                        .on(ANY, |f| f.ignore())
                                        .finish()
                                })
                            })
                            .on(ANY, |f| f.ignore())
                            .finish()
                    })
                })
                .otherwise(|f| f.ignore())
        })
        .unwrap();
        request
    });

    assert_eq!(
        request,
        Request {
            filename: "example.rs".into(),
            opt_level: 2,
            features: vec!["serde".into(), "tokio".into()],
        }
    );
}

#[rstest]
#[case::unbalanced(br#"{"a": [1, 2}"#, ErrorReason::ExpectedCommaOrClosingBracket, 11)]
#[case::bad_escape(br#"{"a": "\x"}"#, ErrorReason::InvalidEscapeSequence, 8)]
#[case::bad_literal(br#"{"a": nul}"#, ErrorReason::InvalidValue, 9)]
fn errors_are_identical_across_contexts(
    #[values(Kind::InPlace, Kind::Const, Kind::Stream)] kind: Kind,
    #[case] input: &[u8],
    #[case] reason: ErrorReason,
    #[case] offset: usize,
) {
    let err = with_context(kind, input, ParserOptions::default(), |ctx| {
        walk(ctx, |_, _| Ok(())).unwrap_err()
    });
    assert_eq!(err.reason(), Some(reason));
    assert_eq!(err.offset(), Some(offset));
}

#[rstest]
fn nesting_limit_applies_to_every_context(
    #[values(Kind::InPlace, Kind::Const, Kind::Stream)] kind: Kind,
) {
    let options = ParserOptions { nesting_limit: 1 };
    let err = with_context(kind, br#"{"a": {"b": {}}}"#, options, |ctx| {
        walk(ctx, |_, _| Ok(())).unwrap_err()
    });
    assert_eq!(
        err.reason(),
        Some(ErrorReason::ExceededNestingLimit { limit: 1 })
    );
    assert_eq!(err.offset(), Some(12));
}

#[test]
fn reader_source() {
    let mut ctx = StreamContext::from_reader(std::io::Cursor::new(DOCUMENT.as_bytes()));
    let mut count = 0;
    walk(&mut ctx, |_, _| {
        count += 1;
        Ok(())
    })
    .unwrap();
    assert_eq!(count, 20);
    assert!(ctx.take_io_error().is_none());
}
