use alloc::{sync::Arc, vec::Vec};
use core::fmt;

pub type Key = Arc<str>;
pub type Index = usize;

/// A component in the path to a JSON value: an object key or an array
/// index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathComponent {
    Key(Key),
    Index(Index),
}

impl PathComponent {
    /// Returns the index if this component is an index, otherwise `None`.
    #[must_use]
    pub fn as_index(&self) -> Option<Index> {
        if let Self::Index(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Returns the key if this component is a key, otherwise `None`.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(v) = self {
            Some(&**v)
        } else {
            None
        }
    }
}

impl From<&str> for PathComponent {
    fn from(s: &str) -> Self {
        Self::Key(s.into())
    }
}

impl From<usize> for PathComponent {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

#[doc(hidden)]
pub trait PathComponentFrom<T> {
    fn from_path_component(value: T) -> PathComponent;
}

macro_rules! impl_integer_as_path_component {
    ($($t:ty),+) => {
        $(
            impl PathComponentFrom<$t> for PathComponent {
                fn from_path_component(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathComponent::Index(value as Index)
                }
            }
        )+
    };
}
impl_integer_as_path_component!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathComponentFrom<&str> for PathComponent {
    fn from_path_component(value: &str) -> Self {
        PathComponent::Key(value.into())
    }
}

/// Location of a value inside a document, outermost component first.
///
/// `Display` renders keys separated by dots and indexes in brackets, with no
/// leading dot: `users[0].name`. The root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath(Vec<PathComponent>);

impl JsonPath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, component: PathComponent) {
        self.0.push(component);
    }

    pub fn pop(&mut self) -> Option<PathComponent> {
        self.0.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PathComponent> {
        self.0.last()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathComponent] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathComponent> {
        self.0.iter()
    }
}

impl From<Vec<PathComponent>> for JsonPath {
    fn from(components: Vec<PathComponent>) -> Self {
        Self(components)
    }
}

impl FromIterator<PathComponent> for JsonPath {
    fn from_iter<T: IntoIterator<Item = PathComponent>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a JsonPath {
    type Item = &'a PathComponent;
    type IntoIter = core::slice::Iter<'a, PathComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            match component {
                PathComponent::Key(key) if i == 0 => f.write_str(key)?,
                PathComponent::Key(key) => write!(f, ".{key}")?,
                PathComponent::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
