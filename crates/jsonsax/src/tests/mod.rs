mod parse_bad;

use alloc::{string::ToString, vec::Vec};

use bstr::ByteSlice;
use serde_json::{Map, Number, Value as Json};

use crate::{
    BufferContext, ConstBufferContext, Context, Flow, PathComponent, Result, StreamContext,
    Value, ValueKind, parse_array, parse_object, traverse,
};

/// Runs `f` over the same input in every context variant.
pub(crate) fn for_each_context<T>(input: &[u8], mut f: impl FnMut(&mut dyn Context) -> T) -> [T; 3] {
    let mut scratch = input.to_vec();
    [
        f(&mut ConstBufferContext::new(input)),
        f(&mut BufferContext::new(&mut scratch)),
        f(&mut StreamContext::new(input.iter().copied())),
    ]
}

/// Consumes a whole document without looking at it.
pub(crate) fn skip_document<C: Context + ?Sized>(ctx: &mut C) -> Result<()> {
    if ctx.toplevel_kind() == Some(ValueKind::Array) {
        parse_array(ctx, |element| element.ignore())
    } else {
        parse_object(ctx, |field| field.ignore())
    }
}

/// Rebuilds the document from what [`traverse`] delivers.
pub(crate) fn reconstruct<C: Context + ?Sized>(ctx: &mut C) -> Result<Json> {
    let mut root = match ctx.toplevel_kind() {
        Some(ValueKind::Array) => Json::Array(Vec::new()),
        _ => Json::Object(Map::new()),
    };
    traverse(ctx, |path, element| {
        let value = match element.kind() {
            ValueKind::Object => Json::Object(Map::new()),
            ValueKind::Array => Json::Array(Vec::new()),
            _ => to_json(element.value()),
        };
        insert_at_path(&mut root, path.as_slice(), value);
        Ok(Flow::Descend)
    })?;
    Ok(root)
}

fn to_json(value: Value<'_>) -> Json {
    match value.kind() {
        ValueKind::String => Json::String(value.as_string().to_str_lossy().into_owned()),
        ValueKind::Number if value.is_integer() => Json::from(value.as_integer()),
        ValueKind::Number => Number::from_f64(value.as_float()).map_or(Json::Null, Json::Number),
        ValueKind::Boolean => Json::Bool(value.as_boolean()),
        ValueKind::Null | ValueKind::Object | ValueKind::Array => Json::Null,
    }
}

// Containers are visited before their children, so every parent exists.
fn insert_at_path(target: &mut Json, path: &[PathComponent], val: Json) {
    let Some((last, parents)) = path.split_last() else {
        *target = val;
        return;
    };
    let mut current = target;
    for comp in parents {
        current = match comp {
            PathComponent::Key(k) => &mut current[&**k],
            PathComponent::Index(i) => &mut current[*i],
        };
    }
    match last {
        PathComponent::Key(k) => {
            current
                .as_object_mut()
                .expect("object parent")
                .insert(k.to_string(), val);
        }
        PathComponent::Index(i) => {
            let array = current.as_array_mut().expect("array parent");
            assert_eq!(array.len(), *i, "indexes are dense");
            array.push(val);
        }
    }
}
