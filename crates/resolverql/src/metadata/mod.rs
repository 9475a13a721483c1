//! Metadata declarations and extraction.
//!
//! Resolver authors declare operation, argument and group metadata next to
//! each method, parameter and group property. The compiler reads it back
//! with [`get_attached`], which returns the first attribute of the requested
//! kind. Later attributes of the same kind on the same member are ignored.

mod attributes;

pub use attributes::{ArgType, Attribute, Group, Mutation, OperationMeta, Query};

/// A member that carries attributes (method, parameter or property).
pub trait Annotated {
    /// Attributes in declaration order.
    fn attributes(&self) -> &[Attribute];
}

/// A kind of attribute that can be looked up on a member.
pub trait MetadataKind: Sized {
    /// Returns the payload if `attribute` is of this kind.
    fn extract(attribute: &Attribute) -> Option<&Self>;
}

/// Returns the first attribute of kind `K` attached to `member`.
pub fn get_attached<K: MetadataKind>(member: &impl Annotated) -> Option<&K> {
    member.attributes().iter().find_map(K::extract)
}

macro_rules! metadata_kind {
    ($($kind:ident),* $(,)?) => {
        $(
            impl MetadataKind for $kind {
                fn extract(attribute: &Attribute) -> Option<&Self> {
                    match attribute {
                        Attribute::$kind(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

metadata_kind!(Query, Mutation, ArgType, Group);

/// Which root an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// Name of the root object type for this kind.
    #[must_use]
    pub fn root_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

/// Operation attribute kinds, used to compile either root from one routine.
pub trait OperationAttribute: MetadataKind {
    const KIND: OperationKind;

    fn meta(&self) -> &OperationMeta;
}

impl OperationAttribute for Query {
    const KIND: OperationKind = OperationKind::Query;

    fn meta(&self) -> &OperationMeta {
        &self.0
    }
}

impl OperationAttribute for Mutation {
    const KIND: OperationKind = OperationKind::Mutation;

    fn meta(&self) -> &OperationMeta {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Member(Vec<Attribute>);

    impl Annotated for Member {
        fn attributes(&self) -> &[Attribute] {
            &self.0
        }
    }

    #[test]
    fn test_absent_kind_returns_none() {
        let member = Member(vec![ArgType::new().into()]);
        assert!(get_attached::<Group>(&member).is_none());
        assert!(get_attached::<Query>(&member).is_none());
    }

    #[test]
    fn test_first_attribute_wins() {
        let member = Member(vec![
            Group::new("First").into(),
            ArgType::named("Int").into(),
            Group::new("Second").into(),
        ]);
        let group = get_attached::<Group>(&member).unwrap();
        assert_eq!(group.class_name, "First");
    }

    #[test]
    fn test_query_and_mutation_are_distinct_kinds() {
        let member = Member(vec![Mutation::new("save", "Boolean").into()]);
        assert!(get_attached::<Query>(&member).is_none());
        let mutation = get_attached::<Mutation>(&member).unwrap();
        assert_eq!(mutation.meta().name, "save");
        assert_eq!(Mutation::KIND.root_name(), "Mutation");
    }
}
