//! Field-name dispatch and subtree skipping.

use bstr::BStr;

use crate::{
    context::{Context, NestedStatus},
    error::Result,
    parser::{parse_array, parse_object},
};

/// Something with a name a [`Dispatch`] can match on.
pub trait Named {
    fn name_bytes(&self) -> &[u8];
}

impl Named for &str {
    fn name_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Named for &[u8] {
    fn name_bytes(&self) -> &[u8] {
        self
    }
}

impl Named for &BStr {
    fn name_bytes(&self) -> &[u8] {
        self
    }
}

/// A name a dispatch rule fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'n> {
    Name(&'n [u8]),
    /// Matches every name.
    Any,
}

/// Wildcard candidate, matching any name.
pub const ANY: Candidate<'static> = Candidate::Any;

impl Candidate<'_> {
    fn matches(&self, name: &[u8]) -> bool {
        match self {
            Self::Name(candidate) => *candidate == name,
            Self::Any => true,
        }
    }
}

impl<'n> From<&'n str> for Candidate<'n> {
    fn from(name: &'n str) -> Self {
        Self::Name(name.as_bytes())
    }
}

impl<'n> From<&'n [u8]> for Candidate<'n> {
    fn from(name: &'n [u8]) -> Self {
        Self::Name(name)
    }
}

impl<'n, const N: usize> From<&'n [u8; N]> for Candidate<'n> {
    fn from(name: &'n [u8; N]) -> Self {
        Self::Name(name)
    }
}

impl<'n> From<&'n BStr> for Candidate<'n> {
    fn from(name: &'n BStr) -> Self {
        Self::Name(name)
    }
}

/// Runs the first rule whose candidate matches the subject's name.
///
/// Rules are tried in the order they are chained. Once one has fired, the
/// remaining ones are no-ops even if they would match too; put [`ANY`] last
/// to act as a fallback.
///
/// The subject is handed to the rule that fires, so a rule on a
/// [`Field`](crate::Field) can descend into its value.
///
/// ```rust
/// use jsonsax::{ANY, ConstBufferContext, parse_object};
///
/// let mut ctx = ConstBufferContext::new(br#"{"id": 7, "tags": ["a"], "x": {"y": 1}}"#);
/// let mut id = 0;
/// let mut tags = Vec::new();
/// parse_object(&mut ctx, |field| {
///     field
///         .dispatch()
///         .on("id", |f| {
///             id = f.value().as_integer();
///             Ok(())
///         })
///         .on("tags", |f| {
///             f.parse_array(|e| {
///                 tags.push(e.value().as_string().to_string());
///                 Ok(())
///             })
///         })
///         .on(ANY, |f| f.ignore())
///         .finish()
/// })?;
/// assert_eq!((id, tags), (7, vec!["a".to_string()]));
/// # Ok::<(), jsonsax::Error>(())
/// ```
#[derive(Debug)]
#[must_use]
pub struct Dispatch<T> {
    subject: Option<T>,
    outcome: Result<()>,
}

impl<T: Named> Dispatch<T> {
    pub fn new(subject: T) -> Self {
        Self {
            subject: Some(subject),
            outcome: Ok(()),
        }
    }

    /// Adds a rule. It runs only if no earlier rule fired and `candidate`
    /// matches.
    pub fn on<'n, F>(mut self, candidate: impl Into<Candidate<'n>>, rule: F) -> Self
    where
        F: FnOnce(T) -> Result<()>,
    {
        let candidate = candidate.into();
        if let Some(subject) = self
            .subject
            .take_if(|subject| candidate.matches(subject.name_bytes()))
        {
            self.outcome = rule(subject);
        }
        self
    }

    /// Whether a rule has fired.
    #[must_use]
    pub fn handled(&self) -> bool {
        self.subject.is_none()
    }

    /// Runs `fallback` on the subject if no rule fired, then returns the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Whatever the rule that ran returned.
    pub fn otherwise<F>(self, fallback: F) -> Result<()>
    where
        F: FnOnce(T) -> Result<()>,
    {
        match self.subject {
            Some(subject) => fallback(subject),
            None => self.outcome,
        }
    }

    /// The outcome of the rule that fired, `Ok(())` if none did.
    ///
    /// # Errors
    ///
    /// Whatever the rule that fired returned.
    pub fn finish(self) -> Result<()> {
        self.outcome
    }
}

/// Skips the container the context has just classified.
///
/// Called from a handler whose value is an object or an array, this consumes
/// the whole subtree through nested parses whose handlers ignore every child,
/// so nothing is materialized and the recursion contract is satisfied. For a
/// scalar it does nothing.
///
/// # Errors
///
/// Any parse error inside the skipped subtree.
pub fn ignore<C: Context + ?Sized>(ctx: &mut C) -> Result<()> {
    match ctx.nested_status() {
        NestedStatus::None => Ok(()),
        NestedStatus::Object => parse_object(ctx, |field| field.ignore()),
        NestedStatus::Array => parse_array(ctx, |element| element.ignore()),
    }
}
