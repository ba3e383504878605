//! A push-based ("SAX-style") JSON decoder.
//!
//! `jsonsax` turns a byte buffer or byte stream into field names and typed
//! values delivered to caller-supplied handlers, without building a
//! document tree. Decoded string content is written back into the memory the
//! input occupies ([`BufferContext`]), into one scratch buffer the size of
//! the input ([`ConstBufferContext`]), or into small growable chunks
//! ([`StreamContext`]).
//!
//! The caller drives the recursion: a handler that receives an object or an
//! array must descend into it, or skip it with [`ignore`], before returning.
//!
//! ```rust
//! use jsonsax::{ANY, ConstBufferContext, parse_object};
//!
//! let mut ctx = ConstBufferContext::new(br#"{"name": "caf\u00e9", "tags": [1, 2], "meta": {"x": [[]]}}"#);
//! let mut name = String::new();
//! let mut tags = Vec::new();
//! parse_object(&mut ctx, |field| {
//!     field
//!         .dispatch()
//!         .on("name", |f| {
//!             name = f.value().as_str().unwrap_or_default().to_owned();
//!             Ok(())
//!         })
//!         .on("tags", |f| {
//!             f.parse_array(|e| {
//!                 tags.push(e.value().as_integer());
//!                 Ok(())
//!             })
//!         })
//!         .on(ANY, |f| f.ignore())
//!         .finish()
//! })?;
//! assert_eq!(name, "caf\u{e9}");
//! assert_eq!(tags, [1, 2]);
//! # Ok::<(), jsonsax::Error>(())
//! ```
//!
//! Whole-document helpers ([`walk`], [`traverse`], [`find_path_at_offset`])
//! are built on the same protocol and track the [`JsonPath`] of every value.
//!
//! The crate is `no_std` with `alloc`. The default `std` feature adds
//! [`ReadBytes`] and [`StreamContext::from_reader`] for `std::io::Read`
//! sources.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod context;
mod dispatch;
mod error;
mod options;
mod parser;
mod traverse;
mod value;

#[cfg(test)]
mod tests;

#[cfg(feature = "std")]
pub use context::ReadBytes;
pub use context::{
    BufferContext, ConstBufferContext, Context, NestedStatus, Nesting, Span, StreamContext,
};
pub use dispatch::{ANY, Candidate, Dispatch, Named, ignore};
pub use error::{Error, ErrorReason, InvariantViolation, ParseError, Result};
pub use options::{DEFAULT_NESTING_LIMIT, ParserOptions};
pub use parser::{Element, Field, parse_array, parse_object};
pub use traverse::{
    Flow, Index, JsonPath, Key, PathComponent, PathComponentFrom, find_path_at_offset, traverse,
    walk,
};
pub use value::{Value, ValueKind};

#[doc(hidden)]
pub use alloc::vec;

/// Builds a [`JsonPath`] from a heterogeneous list of keys and indices.
///
/// ```rust
/// use jsonsax::{PathComponent, path};
///
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p.as_slice(),
///     [
///         PathComponent::Index(0),
///         PathComponent::Key("foo".into()),
///         PathComponent::Index(2)
///     ]
/// );
/// assert_eq!(p.to_string(), "[0].foo[2]");
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        #[allow(unused_imports)]
        use $crate::PathComponentFrom;
        let components: $crate::vec::Vec<$crate::PathComponent> =
            $crate::vec![$($crate::PathComponent::from_path_component($elem)),*];
        $crate::JsonPath::from(components)
    }};
}
