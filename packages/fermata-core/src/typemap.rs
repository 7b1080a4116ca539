//! Immutable, insertion-ordered map keyed by runtime type tags.
//!
//! At most one value per distinct tag. Every mutation (`add`, `union`)
//! returns a new map; operands are never touched. Overwriting an existing tag
//! replaces the value in place and keeps the original insertion position, for
//! both `add` and `union`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::tag::Tag;

/// Lookup failure for a tag the map has no entry for.
///
/// Callers are expected to only request tags the map is statically known to
/// contain; this is a programmer-error signal, not a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing key: TypeMap has no entry for {tag}")]
pub struct MissingKey {
    pub tag: Tag,
}

type ShowFn = fn(&(dyn Any + Send + Sync)) -> String;

#[derive(Clone)]
struct Entry {
    tag: Tag,
    value: Arc<dyn Any + Send + Sync>,
    show: ShowFn,
}

fn show_entry<T: fmt::Debug + 'static>(value: &(dyn Any + Send + Sync)) -> String {
    match value.downcast_ref::<T>() {
        Some(v) => format!("{:?}", v),
        None => "<corrupt entry>".to_string(),
    }
}

/// Heterogeneous container keyed by [`Tag`].
#[derive(Clone, Default)]
pub struct TypeMap {
    entries: Vec<Entry>,
}

impl TypeMap {
    /// The empty map. Identity for [`TypeMap::union`].
    pub fn new() -> TypeMap {
        TypeMap {
            entries: Vec::new(),
        }
    }

    /// Single-binding map.
    pub fn of<T: fmt::Debug + Send + Sync + 'static>(value: T) -> TypeMap {
        TypeMap::new().add(value)
    }

    /// New map with `value` bound under `T`'s tag. Overwrites any existing
    /// entry for that tag in place; the receiver is untouched.
    pub fn add<T: fmt::Debug + Send + Sync + 'static>(&self, value: T) -> TypeMap {
        self.insert_raw(Entry {
            tag: Tag::of::<T>(),
            value: Arc::new(value),
            show: show_entry::<T>,
        })
    }

    fn insert_raw(&self, entry: Entry) -> TypeMap {
        let mut entries = self.entries.clone();
        match entries.iter_mut().find(|e| e.tag == entry.tag) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        TypeMap { entries }
    }

    /// The value bound under `T`'s tag, or [`MissingKey`].
    pub fn get<T: 'static>(&self) -> Result<&T, MissingKey> {
        let tag = Tag::of::<T>();
        self.entries
            .iter()
            .find(|e| e.tag == tag)
            .and_then(|e| e.value.downcast_ref::<T>())
            .ok_or(MissingKey { tag })
    }

    /// Like [`TypeMap::get`] but without the error payload.
    pub fn try_get<T: 'static>(&self) -> Option<&T> {
        self.get::<T>().ok()
    }

    /// True iff the map has an entry for `tag`.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.entries.iter().any(|e| e.tag == *tag)
    }

    /// New map containing the receiver's entries overwritten by `other`'s on
    /// tag collision (right-biased).
    pub fn union(&self, other: &TypeMap) -> TypeMap {
        let mut merged = self.clone();
        for entry in &other.entries {
            merged = merged.insert_raw(entry.clone());
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.entries.iter().map(|e| &e.tag)
    }
}

impl fmt::Display for TypeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeMap(")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", entry.tag, (entry.show)(entry.value.as_ref()))?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for TypeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
