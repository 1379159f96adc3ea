use num_cmp::NumCmp;
use serde_json::{Map, Number, Value};

use crate::decode::decode;
use crate::error::{Mismatch, Path, Shape, Side};
use crate::MatchResult;

/// Decodes both documents and checks that `actual` satisfies `expected`.
///
/// The actual document is decoded first, so when both are malformed the
/// failure names the actual side.
pub fn match_bytes(actual: &[u8], expected: &[u8]) -> MatchResult {
    let actual = decode(actual).map_err(|source| Mismatch::Decode {
        side: Side::Actual,
        source,
    })?;
    let expected = decode(expected).map_err(|source| Mismatch::Decode {
        side: Side::Expected,
        source,
    })?;
    match_values(&actual, &expected)
}

/// Checks whether `actual` satisfies `expected`.
///
/// Matching is asymmetric and driven by the expected value:
/// - **Objects** — every expected key must be satisfied by the same key in
///   `actual` (an absent key reads as `null`). Extra actual keys are ignored.
/// - **Lists** — every expected element must be satisfied by at least one
///   actual element. Order and duplicates do not matter, and several expected
///   elements may be satisfied by the same actual element.
/// - **Scalars** — same type and value; numbers compare numerically, so `1`
///   equals `1.0`.
///
/// An expected object is also satisfied by a list containing a satisfying
/// object, and an expected list by an object that satisfies one of its
/// elements. Some APIs wrap single objects inconsistently; the accommodation
/// stops at that one level.
pub fn match_values(actual: &Value, expected: &Value) -> MatchResult {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => match_object(actual, expected),
        (Value::Object(expected), Value::Array(candidates)) => {
            match_any_candidate(candidates, expected)
        }
        (Value::Array(expected), Value::Array(actual)) => match_list(actual, expected),
        (Value::Array(alternatives), Value::Object(actual)) => {
            match_any_alternative(actual, alternatives)
        }
        (Value::Object(_) | Value::Array(_), _) => Err(type_mismatch(expected, actual)),
        _ => match_scalar(actual, expected),
    }
}

fn match_object(actual: &Map<String, Value>, expected: &Map<String, Value>) -> MatchResult {
    for (key, expected) in expected {
        let actual = actual.get(key).unwrap_or(&Value::Null);
        match_values(actual, expected).map_err(|err| err.within(key))?;
    }
    Ok(())
}

fn match_list(actual: &[Value], expected: &[Value]) -> MatchResult {
    let missing: Vec<Value> = expected
        .iter()
        .filter(|expected| {
            !actual
                .iter()
                .any(|candidate| match_values(candidate, expected).is_ok())
        })
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Mismatch::ListElementUnsatisfied {
            path: Path::root(),
            missing,
        })
    }
}

/// Expected object, actual list: first object element that satisfies wins.
/// Otherwise the failure of the last object tried is reported.
fn match_any_candidate(candidates: &[Value], expected: &Map<String, Value>) -> MatchResult {
    let mut last = None;
    for candidate in candidates {
        let outcome = match candidate {
            Value::Object(candidate) => match_object(candidate, expected),
            other => Err(Mismatch::TypeMismatch {
                path: Path::root(),
                expected: Shape::Object,
                actual: Shape::of(other),
            }),
        };
        match outcome {
            Ok(()) => return Ok(()),
            Err(err) => last = Some(err),
        }
    }
    Err(last.unwrap_or_else(|| Mismatch::ListElementUnsatisfied {
        path: Path::root(),
        missing: vec![Value::Object(expected.clone())],
    }))
}

/// Expected list, actual object: the object must satisfy one of the
/// expected elements.
fn match_any_alternative(actual: &Map<String, Value>, alternatives: &[Value]) -> MatchResult {
    let satisfied = alternatives.iter().any(|alternative| match alternative {
        Value::Object(alternative) => match_object(actual, alternative).is_ok(),
        _ => false,
    });
    if satisfied {
        Ok(())
    } else {
        Err(Mismatch::ListElementUnsatisfied {
            path: Path::root(),
            missing: alternatives.to_vec(),
        })
    }
}

fn match_scalar(actual: &Value, expected: &Value) -> MatchResult {
    let equal = match (expected, actual) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(e), Value::Bool(a)) => e == a,
        (Value::String(e), Value::String(a)) => e == a,
        (Value::Number(e), Value::Number(a)) => numbers_equal(e, a),
        _ => return Err(type_mismatch(expected, actual)),
    };
    if equal {
        Ok(())
    } else {
        Err(Mismatch::ValueMismatch {
            path: Path::root(),
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}

fn type_mismatch(expected: &Value, actual: &Value) -> Mismatch {
    Mismatch::TypeMismatch {
        path: Path::root(),
        expected: Shape::of(expected),
        actual: Shape::of(actual),
    }
}

/// JSON numeric equality across integer and float representations.
fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let Some(left) = left.as_u64() {
        number_equals(left, right)
    } else if let Some(left) = left.as_i64() {
        number_equals(left, right)
    } else if let Some(left) = left.as_f64() {
        number_equals(left, right)
    } else {
        left == right
    }
}

fn number_equals<T>(left: T, right: &Number) -> bool
where
    T: Copy + NumCmp<u64> + NumCmp<i64> + NumCmp<f64>,
{
    if let Some(right) = right.as_u64() {
        NumCmp::num_eq(left, right)
    } else if let Some(right) = right.as_i64() {
        NumCmp::num_eq(left, right)
    } else if let Some(right) = right.as_f64() {
        NumCmp::num_eq(left, right)
    } else {
        false
    }
}
