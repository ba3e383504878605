//! Whole-document traversal built on the handler protocol.
//!
//! Nothing here parses on its own: [`traverse`] drives [`parse_object`] and
//! [`parse_array`] from the top-level container down, keeping track of the
//! [`JsonPath`] of every value it hands to the visitor.

mod path;

use bstr::ByteSlice;
pub use path::{Index, JsonPath, Key, PathComponent, PathComponentFrom};

use crate::{
    context::{ConstBufferContext, Context},
    error::{Error, Result},
    parser::{Element, Field, parse_array, parse_object},
    value::{Value, ValueKind},
};

/// What [`traverse`] does with a container after visiting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Visit the container's children.
    Descend,
    /// Consume the container without visiting its children.
    Skip,
}

/// Visits every value of the document, outermost first.
///
/// The top-level value must be an object or an array; it is not visited
/// itself. For every other value `visit` receives its path and the
/// [`Element`], and returns whether to descend into it. The return value is
/// ignored for scalars.
///
/// # Errors
///
/// [`Error::NotAContainer`] when the document does not start with `{` or
/// `[`, any parse error, and any error `visit` returns.
pub fn traverse<C, F>(ctx: &mut C, mut visit: F) -> Result<()>
where
    C: Context + ?Sized,
    F: FnMut(&JsonPath, &Element<'_, C>) -> Result<Flow>,
{
    let mut path = JsonPath::new();
    match ctx.toplevel_kind() {
        Some(ValueKind::Object) => {
            parse_object(ctx, |field| visit_field(field, &mut path, &mut visit))
        }
        Some(ValueKind::Array) => {
            let mut index = 0;
            parse_array(ctx, |element| {
                visit_index(element, &mut index, &mut path, &mut visit)
            })
        }
        _ => Err(Error::NotAContainer),
    }
}

fn visit_field<C, F>(field: Field<'_, C>, path: &mut JsonPath, visit: &mut F) -> Result<()>
where
    C: Context + ?Sized,
    F: FnMut(&JsonPath, &Element<'_, C>) -> Result<Flow>,
{
    path.push(PathComponent::Key(field.name().to_str_lossy().into()));
    let result = visit_element(field.into_element(), path, visit);
    path.pop();
    result
}

fn visit_index<C, F>(
    element: Element<'_, C>,
    index: &mut Index,
    path: &mut JsonPath,
    visit: &mut F,
) -> Result<()>
where
    C: Context + ?Sized,
    F: FnMut(&JsonPath, &Element<'_, C>) -> Result<Flow>,
{
    path.push(PathComponent::Index(*index));
    *index += 1;
    let result = visit_element(element, path, visit);
    path.pop();
    result
}

fn visit_element<C, F>(element: Element<'_, C>, path: &mut JsonPath, visit: &mut F) -> Result<()>
where
    C: Context + ?Sized,
    F: FnMut(&JsonPath, &Element<'_, C>) -> Result<Flow>,
{
    let flow = visit(path, &element)?;
    match (flow, element.kind()) {
        (Flow::Descend, ValueKind::Object) => {
            element.parse_object(|field| visit_field(field, path, visit))
        }
        (Flow::Descend, ValueKind::Array) => {
            let mut index = 0;
            element.parse_array(|child| visit_index(child, &mut index, path, visit))
        }
        _ => element.ignore(),
    }
}

/// Calls `visit` with the path and value of every scalar in the document.
///
/// ```rust
/// use jsonsax::{ConstBufferContext, walk};
///
/// let mut ctx = ConstBufferContext::new(br#"{"a": [1, {"b": null}], "c": "x"}"#);
/// let mut lines = Vec::new();
/// walk(&mut ctx, |path, value| {
///     lines.push(format!("{path} = {} ({})", value.as_string(), value.kind()));
///     Ok(())
/// })?;
/// assert_eq!(lines, [
///     "a[0] = 1 (Number)",
///     "a[1].b = null (Null)",
///     "c = x (String)",
/// ]);
/// # Ok::<(), jsonsax::Error>(())
/// ```
///
/// # Errors
///
/// As for [`traverse`].
pub fn walk<C, F>(ctx: &mut C, mut visit: F) -> Result<()>
where
    C: Context + ?Sized,
    F: FnMut(&JsonPath, Value<'_>) -> Result<()>,
{
    traverse(ctx, |path, element| {
        if !element.kind().is_container() {
            visit(path, element.value())?;
        }
        Ok(Flow::Descend)
    })
}

/// Finds the path of the value at a byte offset.
///
/// Returns the path of the first value whose classification leaves the read
/// cursor at or past `offset`: for a container that is just past its opening
/// bracket, for a string just past its closing quote, and for other scalars
/// just past the byte that ended them. Everything from that value on is
/// skipped. `None` if no value reaches `offset`.
///
/// # Errors
///
/// As for [`traverse`]; the whole document is parsed.
pub fn find_path_at_offset(input: &[u8], offset: usize) -> Result<Option<JsonPath>> {
    let mut ctx = ConstBufferContext::new(input);
    let mut found = None;
    traverse(&mut ctx, |path, element| {
        if found.is_some() {
            return Ok(Flow::Skip);
        }
        if element.read_offset() >= offset {
            tracing::debug!(offset, %path, "found value at offset");
            found = Some(path.clone());
            return Ok(Flow::Skip);
        }
        Ok(Flow::Descend)
    })?;
    Ok(found)
}
