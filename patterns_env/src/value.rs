//! Argument and result values.
//!
//! Participants exchange plain JSON values so that scripts stay serializable.
//! Results are compared with a tolerance for floating point noise.

use crate::error::ParticipantFault;
use approx::relative_eq;
use serde::de::DeserializeOwned;

pub use serde_json::Value;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Builds a numeric value, storing integral results as integers.
///
/// `120.0` becomes `120`, so results print the way they read. Non-finite input
/// becomes `Value::Null`.
pub fn number(x: f64) -> Value {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < MAX_EXACT_INTEGER {
        Value::from(x as i64)
    } else {
        serde_json::Number::from_f64(x)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Extracts argument `index` as a number.
pub fn number_arg(args: &[Value], index: usize) -> Result<f64, ParticipantFault> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| ParticipantFault::bad_argument(index, "a number"))
}

/// Extracts argument `index` as a string.
pub fn text_arg(args: &[Value], index: usize) -> Result<&str, ParticipantFault> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| ParticipantFault::bad_argument(index, "a string"))
}

/// Deserializes argument `index` into `T`.
pub fn decode_arg<T: DeserializeOwned>(args: &[Value], index: usize) -> Result<T, ParticipantFault> {
    let raw = args
        .get(index)
        .ok_or_else(|| ParticipantFault::bad_argument(index, "present"))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| ParticipantFault::new(format!("argument {}: {}", index, e)))
}

/// Formats an argument list as `a, b, c`, each argument in full JSON.
pub fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compares an actual result against an expected one.
///
/// Integer pairs compare exactly. Numbers with a float on either side
/// compare with a relative tolerance. Arrays compare element-wise and objects
/// key-wise; everything else compares exactly.
pub fn matches(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) if !a.is_f64() && !b.is_f64() => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => relative_eq!(a, b, epsilon = 1e-12, max_relative = 1e-9),
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| matches(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| matches(v, w)))
        }
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_number_integral_becomes_integer() {
        assert_eq!(number(120.0), json!(120));
        assert_eq!(number(11.6).to_string(), "11.6");
        assert_eq!(number(f64::NAN), Value::Null);
    }

    #[test]
    fn test_matches_tolerates_float_noise() {
        assert!(matches(&json!(0.1 + 0.2), &json!(0.3)));
        assert!(matches(&json!(120.0), &json!(120)));
        assert!(!matches(&json!(120.5), &json!(120)));
    }

    #[test]
    fn test_matches_large_integers_exactly() {
        let big: i64 = 1 << 60;
        assert!(matches(&json!(big), &json!(big)));
        assert!(!matches(&json!(big), &json!(big + 1)));
        assert!(!matches(&json!(u64::MAX), &json!(u64::MAX - 1)));
        assert!(!matches(&json!(-big), &json!(-big - 1)));
        assert!(matches(&number(120.0), &json!(120)));
    }

    #[test]
    fn test_matches_nested() {
        let actual = json!({"total": 170.0, "items": ["Tortas", "Tacos"]});
        let expected = json!({"items": ["Tortas", "Tacos"], "total": 170});
        assert!(matches(&actual, &expected));

        assert!(!matches(&json!(["a"]), &json!(["a", "b"])));
        assert!(!matches(&json!({"a": 1}), &json!({"b": 1})));
    }

    #[test]
    fn test_argument_helpers() {
        let args = vec![json!(100), json!("admin")];
        assert_eq!(number_arg(&args, 0).unwrap(), 100.0);
        assert_eq!(text_arg(&args, 1).unwrap(), "admin");
        assert!(number_arg(&args, 1).is_err());
        assert!(text_arg(&args, 2).is_err());
        assert_eq!(join_args(&args), "100, \"admin\"");
    }

    #[test]
    fn test_join_args_keeps_long_values() {
        let long = "y".repeat(200);
        let joined = join_args(&[json!(long), json!(1)]);
        assert_eq!(joined, format!("\"{}\", 1", long));
    }

    #[test]
    fn test_decode_arg() {
        #[derive(serde::Deserialize)]
        struct Flags {
            paid: bool,
        }

        let args = vec![json!({"paid": true})];
        let flags: Flags = decode_arg(&args, 0).unwrap();
        assert!(flags.paid);
        assert!(decode_arg::<Flags>(&args, 1).is_err());
    }

    proptest! {
        #[test]
        fn test_matches_is_reflexive(x in -1.0e12f64..1.0e12) {
            prop_assert!(matches(&number(x), &number(x)));
        }
    }
}
