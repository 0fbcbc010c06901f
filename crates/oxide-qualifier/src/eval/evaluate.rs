//! Evaluation of qualifiers against object graphs.

use super::members::{Member, Members};
use crate::ast::{
    ClauseQualifier, ColumnQualifier, Conjunction, PathQualifier, PropertyQualifier, Qualifier,
};
use crate::error::EvaluationError;
use crate::value::Value;

impl Qualifier {
    /// Evaluates this qualifier against `object`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] when a member cannot be resolved or
    /// compared, or when the tree contains a column qualifier.
    pub fn evaluate(&self, object: &dyn Members) -> Result<bool, EvaluationError> {
        match self {
            Self::Column(column) => Err(EvaluationError::UnsupportedQualifier {
                qualifier: column.to_string(),
                reason: "column qualifiers only evaluate raw column values",
            }),
            Self::Property(property) => property.evaluate(object),
            Self::Path(path) => path.evaluate(object),
            Self::Clause(clause) => clause.evaluate(object),
        }
    }

    /// Returns the objects this qualifier holds for, in their original
    /// order.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvaluationError`] raised by any object.
    pub fn filter<'a, T: Members>(&self, objects: &'a [T]) -> Result<Vec<&'a T>, EvaluationError> {
        let mut matched = Vec::new();
        for object in objects {
            if self.evaluate(object)? {
                matched.push(object);
            }
        }
        Ok(matched)
    }
}

impl ColumnQualifier {
    /// Tests a raw column value against the predicate.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] if the predicate cannot compare the
    /// value.
    pub fn evaluate_value(&self, value: &Value) -> Result<bool, EvaluationError> {
        self.predicate().is_true_for(value)
    }
}

impl PropertyQualifier {
    /// Reads the named member of `object` and tests it.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnknownMember`] or
    /// [`EvaluationError::NotAValue`] when the member is missing or is a
    /// present relationship, and the predicate's errors otherwise.
    pub fn evaluate(&self, object: &dyn Members) -> Result<bool, EvaluationError> {
        let value = member_value(object, self.property())?;
        self.predicate().is_true_for(&value)
    }
}

impl PathQualifier {
    /// Follows the path from `object` and evaluates the inner qualifier at
    /// its end. Absent relationships make the qualifier false; to-many
    /// relationships make it existential.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::NotTraversable`] when a path element is
    /// a scalar, plus any error of the inner qualifier.
    pub fn evaluate(&self, object: &dyn Members) -> Result<bool, EvaluationError> {
        walk(object, self.elements(), self.qualifier())
    }
}

impl ClauseQualifier {
    /// `and` holds when every child holds, `or` when any child does. Both
    /// stop at the first child that decides the result.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnsupportedQualifier`] for an `or` clause
    /// with a child that cannot be evaluated against objects, plus any
    /// error of an evaluated child.
    pub fn evaluate(&self, object: &dyn Members) -> Result<bool, EvaluationError> {
        match self.conjunction() {
            Conjunction::And => {
                for child in self.children() {
                    if !child.evaluate(object)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Conjunction::Or => {
                if let Some(child) = self.children().iter().find(|c| !c.supports_evaluation()) {
                    return Err(EvaluationError::UnsupportedQualifier {
                        qualifier: child.to_string(),
                        reason: "every child of an or clause must support object evaluation",
                    });
                }
                for child in self.children() {
                    if child.evaluate(object)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

fn unknown_member(object: &dyn Members, name: &str) -> EvaluationError {
    EvaluationError::UnknownMember {
        member: String::from(name),
        type_name: String::from(object.type_name()),
    }
}

/// Reads a member in value position. An absent to-one relationship reads
/// as null.
pub(crate) fn member_value(object: &dyn Members, name: &str) -> Result<Value, EvaluationError> {
    match object.member(name) {
        None => Err(unknown_member(object, name)),
        Some(Member::Value(value)) => Ok(value),
        Some(Member::Object(None)) => Ok(Value::Null),
        Some(Member::Object(Some(_)) | Member::Collection(_)) => {
            Err(EvaluationError::NotAValue {
                member: String::from(name),
                type_name: String::from(object.type_name()),
            })
        }
    }
}

fn walk(object: &dyn Members, path: &[String], qualifier: &Qualifier) -> Result<bool, EvaluationError> {
    let Some((head, rest)) = path.split_first() else {
        return qualifier.evaluate(object);
    };
    match object.member(head) {
        None => Err(unknown_member(object, head)),
        Some(Member::Value(Value::Null) | Member::Object(None)) => Ok(false),
        Some(Member::Value(_)) => Err(EvaluationError::NotTraversable {
            member: head.clone(),
            type_name: String::from(object.type_name()),
        }),
        Some(Member::Object(Some(next))) => walk(next, rest, qualifier),
        Some(Member::Collection(items)) => {
            for item in items {
                if walk(item, rest, qualifier)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Predicate;
    use crate::value::ToValue;

    struct Person {
        name: &'static str,
    }

    struct Film {
        title: &'static str,
        year: i64,
        director: Option<Person>,
        cast: Vec<Person>,
    }

    impl Members for Person {
        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Name" => Some(Member::Value(self.name.to_value())),
                _ => None,
            }
        }
    }

    impl Members for Film {
        fn type_name(&self) -> &'static str {
            "Film"
        }

        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Title" => Some(Member::Value(self.title.to_value())),
                "Year" => Some(Member::Value(self.year.to_value())),
                "Director" => Some(Member::Object(
                    self.director.as_ref().map(|d| d as &dyn Members),
                )),
                "Cast" => Some(Member::Collection(
                    self.cast.iter().map(|p| p as &dyn Members).collect(),
                )),
                _ => None,
            }
        }
    }

    fn star_wars() -> Film {
        Film {
            title: "Star Wars",
            year: 1977,
            director: Some(Person {
                name: "George Lucas",
            }),
            cast: vec![
                Person {
                    name: "Mark Hamill",
                },
                Person {
                    name: "Carrie Fisher",
                },
            ],
        }
    }

    fn property(name: &str, predicate: Predicate) -> Qualifier {
        Qualifier::property(name, predicate)
    }

    #[test]
    fn test_property() {
        let film = star_wars();
        assert!(property("Title", Predicate::equals("Star Wars")).evaluate(&film).unwrap());
        assert!(!property("Year", Predicate::less_than(1970)).evaluate(&film).unwrap());
    }

    #[test]
    fn test_unknown_member() {
        assert_eq!(
            property("Budget", Predicate::equals(1)).evaluate(&star_wars()),
            Err(EvaluationError::UnknownMember {
                member: String::from("Budget"),
                type_name: String::from("Film")
            })
        );
    }

    #[test]
    fn test_relationship_in_value_position() {
        assert!(matches!(
            property("Director", Predicate::equals("x")).evaluate(&star_wars()),
            Err(EvaluationError::NotAValue { .. })
        ));
        let mut film = star_wars();
        film.director = None;
        assert!(property("Director", Predicate::equals(Value::Null))
            .evaluate(&film)
            .unwrap());
    }

    #[test]
    fn test_path_to_one() {
        let qualifier = Qualifier::path(["Director"], property("Name", Predicate::like("George%")));
        let mut film = star_wars();
        assert!(qualifier.evaluate(&film).unwrap());
        film.director = None;
        assert!(!qualifier.evaluate(&film).unwrap());
    }

    #[test]
    fn test_path_to_many_is_existential() {
        let film = star_wars();
        let carrie = Qualifier::path(["Cast"], property("Name", Predicate::equals("Carrie Fisher")));
        let harrison = Qualifier::path(["Cast"], property("Name", Predicate::like("Harrison%")));
        assert!(carrie.evaluate(&film).unwrap());
        assert!(!harrison.evaluate(&film).unwrap());
    }

    #[test]
    fn test_path_through_scalar() {
        assert!(matches!(
            Qualifier::path(["Title"], property("Name", Predicate::equals("x"))).evaluate(&star_wars()),
            Err(EvaluationError::NotTraversable { .. })
        ));
    }

    #[test]
    fn test_and_short_circuits() {
        let qualifier = Qualifier::and([
            property("Year", Predicate::less_than(1970)),
            property("Budget", Predicate::equals(1)),
        ]);
        assert!(!qualifier.evaluate(&star_wars()).unwrap());
    }

    #[test]
    fn test_or_short_circuits() {
        let qualifier = Qualifier::or([
            property("Year", Predicate::equals(1977)),
            property("Budget", Predicate::equals(1)),
        ]);
        assert!(qualifier.evaluate(&star_wars()).unwrap());
    }

    #[test]
    fn test_or_rejects_column_children_up_front() {
        let qualifier = Qualifier::or([
            property("Year", Predicate::equals(1977)),
            Qualifier::column("Year", Predicate::equals(1977)),
        ]);
        assert!(matches!(
            qualifier.evaluate(&star_wars()),
            Err(EvaluationError::UnsupportedQualifier { .. })
        ));
    }

    #[test]
    fn test_column_qualifier() {
        let column = ColumnQualifier::new("Year", Predicate::greater_than(1970));
        assert!(column.evaluate_value(&Value::Int(1977)).unwrap());
        assert!(matches!(
            Qualifier::Column(column).evaluate(&star_wars()),
            Err(EvaluationError::UnsupportedQualifier { .. })
        ));
    }

    #[test]
    fn test_filter_keeps_order() {
        let films = [
            star_wars(),
            Film {
                title: "Alien",
                year: 1979,
                director: None,
                cast: vec![],
            },
        ];
        let rows = property("Year", Predicate::greater_than(1970)).filter(&films).unwrap();
        assert_eq!(rows.iter().map(|f| f.title).collect::<Vec<_>>(), ["Star Wars", "Alien"]);
    }
}
