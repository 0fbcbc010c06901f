//! `Members` for JSON documents.

use super::members::{Member, Members};
use crate::value::Value;

/// Objects resolve their keys; nested objects are to-one relationships,
/// arrays are to-many relationships and everything else is a scalar.
impl Members for serde_json::Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    fn member(&self, name: &str) -> Option<Member<'_>> {
        let Self::Object(fields) = self else {
            return None;
        };
        let field = fields.get(name)?;
        Some(match field {
            Self::Object(_) => Member::Object(Some(field as &dyn Members)),
            Self::Array(items) => {
                Member::Collection(items.iter().map(|item| item as &dyn Members).collect())
            }
            scalar => Member::Value(Value::from_json(scalar)),
        })
    }
}
