#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonsax::{
    BufferContext, ConstBufferContext, Context, ErrorReason, Flow, ParseError, ParserOptions,
    StreamContext, traverse,
};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 2; // 1 flag + 1 nesting limit

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

// Everything `isspace` accepts.
static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"\x0B", b"\x0C"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1] = with_rng(|rng| rng.random_range(0..=40));

        let mut prefix = HEADER;
        let limit = max_size - prefix;
        prefix += append_whitespace(&mut data[prefix..], limit);
        let limit = max_size - prefix;
        prefix += append_document(&mut data[prefix..], size, limit);
        let limit = max_size - prefix;
        prefix += append_whitespace(&mut data[prefix..], limit);
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append 1‒8 whitespace bytes to `buf`, never exceeding `limit`.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let n = rng.random_range(1..=limit.min(8));
        for slot in &mut buf[..n] {
            *slot = WS_TABLE[rng.random_range(0..WS_TABLE.len())][0];
        }
        n
    })
}

fn append_document(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..=size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        match ArbitraryDocument::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            Ok(value) => break value,
            Err(_) => continue,
        };
    };

    let serialized = if with_rng(|rng| rng.random_bool(0.5)) {
        serde_json::to_vec_pretty(&value.0)
    } else {
        serde_json::to_vec(&value.0)
    }
    .expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::from(u.arbitrary::<i64>()?),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// A top-level object or array.
#[derive(Debug)]
struct ArbitraryDocument(Value);

impl<'a> Arbitrary<'a> for ArbitraryDocument {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let value = ArbitraryValue::arbitrary(u)?.0;
        match value {
            Value::Array(_) | Value::Object(_) => Ok(Self(value)),
            other => Ok(Self(Value::Array(vec![other]))),
        }
    }
}

/// Everything a parse reports, in a form the contexts can be compared on.
#[derive(Debug, PartialEq)]
struct Outcome {
    visited: usize,
    result: Result<(), Option<ParseError>>,
}

fn run<C: Context + ?Sized>(ctx: &mut C) -> Outcome {
    let mut visited = 0;
    let result = traverse(ctx, |_, element| {
        // Resolve every value to exercise span lookups.
        let _ = element.value();
        visited += 1;
        Ok(Flow::Descend)
    })
    .map_err(|err| err.as_parse_error().copied());
    Outcome { visited, result }
}

fn depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let options = ParserOptions {
        nesting_limit: usize::from(data[1]),
    };
    let input = &data[HEADER..];

    let mut scratch = input.to_vec();
    let outcomes = [
        run(&mut ConstBufferContext::with_options(input, options)),
        run(&mut BufferContext::with_options(&mut scratch, options)),
        if flags & 1 == 0 {
            run(&mut StreamContext::with_options(input.iter().copied(), options))
        } else {
            run(&mut StreamContext::from_reader_with_options(input, options))
        },
    ];
    assert_eq!(outcomes[0], outcomes[1], "in-place context disagrees");
    assert_eq!(outcomes[0], outcomes[2], "stream context disagrees");

    // Anything serde_json accepts as a container within the limit must parse,
    // except for numbers outside the normal `f64` range.
    let Ok(value @ (Value::Array(_) | Value::Object(_))) = serde_json::from_slice::<Value>(input)
    else {
        return;
    };
    if depth(&value) > options.nesting_limit + 1 {
        return;
    }
    match &outcomes[0].result {
        Ok(()) => {}
        Err(Some(err)) if err.reason() == ErrorReason::InvalidValue => {}
        Err(err) => panic!("valid document rejected: {err:?}"),
    }
}

fuzz_target!(|data: &[u8]| parser(data));
