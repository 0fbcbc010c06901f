//! Dynamic member access.

use crate::value::Value;

/// What a member lookup found.
pub enum Member<'a> {
    /// A scalar value; `Value::Null` for an unset scalar.
    Value(Value),
    /// A to-one relationship; `None` when absent.
    Object(Option<&'a dyn Members>),
    /// A to-many relationship.
    Collection(Vec<&'a dyn Members>),
}

impl std::fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Object(None) => f.write_str("Object(None)"),
            Self::Object(Some(object)) => write!(f, "Object({})", object.type_name()),
            Self::Collection(items) => write!(f, "Collection(len = {})", items.len()),
        }
    }
}

/// Types whose members can be looked up by name at run time.
///
/// Usually derived with `#[derive(Members)]`; implemented here for
/// `serde_json::Value`.
///
/// # Example
///
/// ```
/// use oxide_qualifier::{Member, Members, ToValue};
///
/// struct Movie {
///     title: String,
/// }
///
/// impl Members for Movie {
///     fn type_name(&self) -> &'static str {
///         "Movie"
///     }
///
///     fn member(&self, name: &str) -> Option<Member<'_>> {
///         match name {
///             "title" | "Title" => Some(Member::Value(self.title.to_value())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Members {
    /// Name of the type, used in error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Looks up a member; `None` if the type has no member of that name.
    fn member(&self, name: &str) -> Option<Member<'_>>;
}

impl<T: Members + ?Sized> Members for &T {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn member(&self, name: &str) -> Option<Member<'_>> {
        (**self).member(name)
    }
}

impl<T: Members + ?Sized> Members for Box<T> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn member(&self, name: &str) -> Option<Member<'_>> {
        (**self).member(name)
    }
}
