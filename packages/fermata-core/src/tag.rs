//! Runtime type tokens.
//!
//! A `Tag` identifies a concrete type at runtime. Two tags are equal iff they
//! denote the same concrete type, including type parameters (the tag for
//! `Abort<String>` is not the tag for `Abort<i64>`). Subtyping is declared at
//! construction via [`Tag::extending`] and is reflexive and transitive;
//! declared ancestors never participate in equality.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Runtime identity token for a type.
///
/// Tags are immutable, cheap to clone, and compared by value. Construction
/// for an unsupported type is a compile-time concern (`T: 'static`), never a
/// runtime failure.
#[derive(Clone)]
pub struct Tag {
    id: TypeId,
    name: &'static str,
    ancestors: Arc<[TypeId]>,
}

impl Tag {
    /// Tag for the concrete type `T`, with no declared ancestors.
    pub fn of<T: ?Sized + 'static>() -> Tag {
        Tag {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            ancestors: Arc::from(Vec::new()),
        }
    }

    /// A copy of this tag that is additionally a subtype of `parent`.
    ///
    /// The parent's own ancestors are folded in, keeping the relation
    /// transitive without a walk at query time.
    pub fn extending(self, parent: &Tag) -> Tag {
        let mut ancestors: Vec<TypeId> = self.ancestors.to_vec();
        if !ancestors.contains(&parent.id) {
            ancestors.push(parent.id);
        }
        for id in parent.ancestors.iter() {
            if !ancestors.contains(id) {
                ancestors.push(*id);
            }
        }
        Tag {
            id: self.id,
            name: self.name,
            ancestors: Arc::from(ancestors),
        }
    }

    /// True iff the type denoted by `self` can always be treated as the type
    /// denoted by `other`. Reflexive.
    pub fn is_subtype_of(&self, other: &Tag) -> bool {
        self.id == other.id || self.ancestors.contains(&other.id)
    }

    /// Fully qualified name of the denoted type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Tag) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tag").field(&self.name).finish()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Animal;
    struct Dog;
    struct Cat;

    #[test]
    fn test_distinct_types_have_distinct_tags() {
        assert_ne!(Tag::of::<Dog>(), Tag::of::<Cat>());
        assert_ne!(Tag::of::<i64>(), Tag::of::<String>());
    }

    #[test]
    fn test_type_parameters_distinguish_tags() {
        assert_ne!(Tag::of::<Vec<i64>>(), Tag::of::<Vec<String>>());
        assert_eq!(Tag::of::<Vec<i64>>(), Tag::of::<Vec<i64>>());
    }

    #[test]
    fn test_subtype_is_reflexive() {
        let tag = Tag::of::<Animal>();
        assert!(tag.is_subtype_of(&tag));
    }

    #[test]
    fn test_declared_subtype_one_way() {
        let animal = Tag::of::<Animal>();
        let dog = Tag::of::<Dog>().extending(&animal);
        assert!(dog.is_subtype_of(&animal));
        assert!(!animal.is_subtype_of(&dog));
    }

    #[test]
    fn test_subtype_is_transitive() {
        let animal = Tag::of::<Animal>();
        let dog = Tag::of::<Dog>().extending(&animal);
        let cat = Tag::of::<Cat>().extending(&dog);
        assert!(cat.is_subtype_of(&animal));
    }

    #[test]
    fn test_ancestors_do_not_affect_equality() {
        let animal = Tag::of::<Animal>();
        let plain = Tag::of::<Dog>();
        let extended = Tag::of::<Dog>().extending(&animal);
        assert_eq!(plain, extended);
    }
}
