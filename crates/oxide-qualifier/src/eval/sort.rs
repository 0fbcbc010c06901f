//! In-memory sorting by [`SortOrdering`] keys.

use std::cmp::Ordering;

use super::evaluate::member_value;
use super::members::{Member, Members};
use crate::error::EvaluationError;
use crate::fetch::SortOrdering;
use crate::value::Value;

/// Sorts `objects` by `orderings`, most significant key first.
///
/// The sort is stable. Nulls sort before every other value; integers and
/// floats compare numerically with each other. Keys are read once per
/// object before sorting.
///
/// # Errors
///
/// Returns an [`EvaluationError`] if a key cannot be read from an object;
/// `objects` is left untouched in that case.
pub fn sort_objects<T: Members>(
    objects: &mut [&T],
    orderings: &[SortOrdering],
) -> Result<(), EvaluationError> {
    if orderings.is_empty() || objects.len() < 2 {
        return Ok(());
    }
    let keys = objects
        .iter()
        .map(|object| sort_keys(*object, orderings))
        .collect::<Result<Vec<_>, _>>()?;

    let mut order: Vec<usize> = (0..objects.len()).collect();
    order.sort_by(|&a, &b| compare_keys(&keys[a], &keys[b], orderings));

    let sorted: Vec<&T> = order.iter().map(|&i| objects[i]).collect();
    objects.copy_from_slice(&sorted);
    Ok(())
}

fn sort_keys(object: &dyn Members, orderings: &[SortOrdering]) -> Result<Vec<Value>, EvaluationError> {
    orderings
        .iter()
        .map(|ordering| {
            let value = key_value(object, &ordering.column)?;
            Ok(match value {
                Value::Text(text) if ordering.direction.is_case_insensitive() => {
                    Value::Text(text.to_uppercase())
                }
                other => other,
            })
        })
        .collect()
}

/// Reads a possibly dotted key, following to-one relationships. An absent
/// relationship on the way yields null.
fn key_value(object: &dyn Members, key: &str) -> Result<Value, EvaluationError> {
    let Some((head, rest)) = key.split_once('.') else {
        return member_value(object, key);
    };
    match object.member(head) {
        Some(Member::Object(Some(next))) => key_value(next, rest),
        Some(Member::Object(None) | Member::Value(Value::Null)) => Ok(Value::Null),
        _ => member_value(object, head),
    }
}

fn compare_keys(a: &[Value], b: &[Value], orderings: &[SortOrdering]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(orderings)
        .map(|((a, b), ordering)| {
            let ordering_of_values = a.sort_cmp(b);
            if ordering.direction.is_descending() {
                ordering_of_values.reverse()
            } else {
                ordering_of_values
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
