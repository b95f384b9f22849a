//! JSON Codec
//!
//! Converts between in-memory JSON (`serde_json::Value` holding native
//! `i64`/`u64` numbers) and the wire form, where every WireInteger is a
//! decimal string. The traversal is driven by a static [`Shape`]; the wire
//! value is never used to guess structure.
//!
//! Both directions borrow their input and build a fresh output value.

use crate::domain::Shape;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Codec failure, naming the offending field path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Syntax(String),

    #[error("{path}: expected {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    #[error("{path}: invalid {expected} value {raw}")]
    InvalidInteger {
        path: String,
        expected: &'static str,
        raw: String,
    },

    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: unknown enum variant {raw:?}")]
    UnknownVariant { path: String, raw: String },

    #[error("type conversion failed: {0}")]
    Conversion(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encode,
    Decode,
}

/// Location inside the value being walked; only rendered on error.
enum Path<'a> {
    Root,
    Field(&'a Path<'a>, &'a str),
    Index(&'a Path<'a>, usize),
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => write!(f, "value"),
            Path::Field(Path::Root, name) => write!(f, "{}", name),
            Path::Field(parent, name) => write!(f, "{}.{}", parent, name),
            Path::Index(parent, i) => write!(f, "{}[{}]", parent, i),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &Path<'_>, expected: impl fmt::Display, found: &Value) -> CodecError {
    CodecError::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found: type_name(found),
    }
}

/// Encode an in-memory value into its wire form.
pub fn encode(value: &Value, shape: &Shape) -> Result<Value, CodecError> {
    walk(value, shape, &Path::Root, Direction::Encode)
}

/// Decode a wire value into its in-memory form.
pub fn decode(value: &Value, shape: &Shape) -> Result<Value, CodecError> {
    walk(value, shape, &Path::Root, Direction::Decode)
}

/// Serialize `value` and encode it against `shape`.
pub fn encode_as<T: Serialize + ?Sized>(value: &T, shape: &Shape) -> Result<Value, CodecError> {
    let native = serde_json::to_value(value).map_err(|e| CodecError::Conversion(e.to_string()))?;
    encode(&native, shape)
}

/// Decode `value` against `shape` and deserialize the result into `T`.
pub fn decode_as<T: DeserializeOwned>(value: &Value, shape: &Shape) -> Result<T, CodecError> {
    let native = decode(value, shape)?;
    serde_json::from_value(native).map_err(|e| CodecError::Conversion(e.to_string()))
}

/// Encode straight to a JSON string.
pub fn to_string<T: Serialize + ?Sized>(value: &T, shape: &Shape) -> Result<String, CodecError> {
    let wire = encode_as(value, shape)?;
    serde_json::to_string(&wire).map_err(|e| CodecError::Conversion(e.to_string()))
}

/// Parse and decode a JSON string.
pub fn from_str<T: DeserializeOwned>(text: &str, shape: &Shape) -> Result<T, CodecError> {
    let wire: Value = serde_json::from_str(text).map_err(|e| CodecError::Syntax(e.to_string()))?;
    decode_as(&wire, shape)
}

/// Parse a request body. An empty (or whitespace-only) body is `{}`.
pub fn parse_body(raw: &[u8]) -> Result<Value, CodecError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(raw).map_err(|e| CodecError::Syntax(e.to_string()))
}

fn walk(value: &Value, shape: &Shape, path: &Path<'_>, dir: Direction) -> Result<Value, CodecError> {
    match shape {
        Shape::Any => Ok(value.clone()),

        Shape::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            other => Err(mismatch(path, shape, other)),
        },

        Shape::String => match value {
            Value::String(_) => Ok(value.clone()),
            other => Err(mismatch(path, shape, other)),
        },

        Shape::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            other => Err(mismatch(path, shape, other)),
        },

        Shape::Enum(variants) => match value {
            Value::String(s) if variants.contains(&s.as_str()) => Ok(value.clone()),
            Value::String(s) => Err(CodecError::UnknownVariant {
                path: path.to_string(),
                raw: s.clone(),
            }),
            other => Err(mismatch(path, shape, other)),
        },

        Shape::Int64 | Shape::Uint64 => match dir {
            Direction::Encode => encode_integer(value, shape, path),
            Direction::Decode => decode_integer(value, shape, path),
        },

        Shape::Array(inner) => {
            let items = value
                .as_array()
                .ok_or_else(|| mismatch(path, shape, value))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| walk(item, inner, &Path::Index(path, i), dir))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }

        Shape::Map(inner) => {
            let entries = value
                .as_object()
                .ok_or_else(|| mismatch(path, shape, value))?;
            let mut out = Map::new();
            for (key, item) in entries {
                out.insert(key.clone(), walk(item, inner, &Path::Field(path, key), dir)?);
            }
            Ok(Value::Object(out))
        }

        Shape::Object(fields) => {
            let entries = value
                .as_object()
                .ok_or_else(|| mismatch(path, shape, value))?;
            let mut out = Map::new();

            for field in fields.iter() {
                let field_path = Path::Field(path, field.name);
                match entries.get(field.name) {
                    None | Some(Value::Null) if field.optional => {}
                    None => {
                        return Err(CodecError::MissingField {
                            path: field_path.to_string(),
                        })
                    }
                    Some(item) => {
                        out.insert(
                            field.name.to_string(),
                            walk(item, &field.shape, &field_path, dir)?,
                        );
                    }
                }
            }

            // Keys the shape does not declare are carried through as-is.
            for (key, item) in entries {
                if !fields.iter().any(|f| f.name == key) {
                    out.insert(key.clone(), item.clone());
                }
            }

            Ok(Value::Object(out))
        }
    }
}

fn encode_integer(value: &Value, shape: &Shape, path: &Path<'_>) -> Result<Value, CodecError> {
    let digits = match (shape, value) {
        (Shape::Int64, Value::Number(n)) => n.as_i64().map(|v| v.to_string()),
        (Shape::Uint64, Value::Number(n)) => n.as_u64().map(|v| v.to_string()),
        _ => return Err(mismatch(path, shape, value)),
    };
    digits.map(Value::String).ok_or_else(|| CodecError::InvalidInteger {
        path: path.to_string(),
        expected: integer_name(shape),
        raw: value.to_string(),
    })
}

fn decode_integer(value: &Value, shape: &Shape, path: &Path<'_>) -> Result<Value, CodecError> {
    let invalid = || CodecError::InvalidInteger {
        path: path.to_string(),
        expected: integer_name(shape),
        raw: value.to_string(),
    };

    match value {
        Value::String(s) => {
            if !is_decimal(s) {
                return Err(invalid());
            }
            match shape {
                Shape::Int64 => s.parse::<i64>().map(Value::from).map_err(|_| invalid()),
                _ => s.parse::<u64>().map(Value::from).map_err(|_| invalid()),
            }
        }
        // Plain JSON integers are accepted as long as they fit the field.
        Value::Number(n) => {
            let fits = match shape {
                Shape::Int64 => n.is_i64(),
                _ => n.is_u64(),
            };
            if fits {
                Ok(value.clone())
            } else {
                Err(invalid())
            }
        }
        other => Err(mismatch(path, format!("{} string", shape), other)),
    }
}

fn integer_name(shape: &Shape) -> &'static str {
    match shape {
        Shape::Int64 => "int64",
        _ => "uint64",
    }
}

/// `-?[0-9]+`
fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;
    use serde::Deserialize;
    use serde_json::json;

    const MESSAGE: Shape = Shape::Object(&[
        Field::required("id", Shape::Uint64),
        Field::required("userId", Shape::Uint64),
        Field::required("timestamp", Shape::Int64),
        Field::required("content", Shape::String),
    ]);

    const BIG_INT_ARRAY_TEST: Shape = Shape::Object(&[
        Field::required("ids", Shape::Array(&Shape::Uint64)),
        Field::required("timestamps", Shape::Array(&Shape::Int64)),
        Field::required("messages", Shape::Array(&MESSAGE)),
    ]);

    const IDS_ONLY: Shape = Shape::Object(&[Field::required("ids", Shape::Array(&Shape::Uint64))]);

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Message {
        id: u64,
        user_id: u64,
        timestamp: i64,
        content: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct BigIntArrayTest {
        ids: Vec<u64>,
        timestamps: Vec<i64>,
        messages: Vec<Message>,
    }

    fn sample() -> BigIntArrayTest {
        BigIntArrayTest {
            ids: vec![1, 2, 3],
            timestamps: vec![-100, 0, 100],
            messages: vec![Message {
                id: 10,
                user_id: 20,
                timestamp: 30,
                content: "test".to_string(),
            }],
        }
    }

    #[test]
    fn test_encode_ids_as_strings() {
        let wire = encode(&json!({"ids": [1, 2, 3]}), &IDS_ONLY).unwrap();
        assert_eq!(wire, json!({"ids": ["1", "2", "3"]}));
    }

    #[test]
    fn test_encode_nested_wire_integers() {
        let wire = encode_as(&sample(), &BIG_INT_ARRAY_TEST).unwrap();
        assert_eq!(
            wire,
            json!({
                "ids": ["1", "2", "3"],
                "timestamps": ["-100", "0", "100"],
                "messages": [
                    {"id": "10", "userId": "20", "timestamp": "30", "content": "test"}
                ]
            })
        );
    }

    #[test]
    fn test_decode_values_beyond_double_precision() {
        let wire = json!({"ids": ["9007199254740992", "18446744073709551615"]});
        let native = decode(&wire, &IDS_ONLY).unwrap();
        let ids = native["ids"].as_array().unwrap();

        assert!(ids.iter().all(|v| v.is_u64() && !v.is_f64()));
        assert_eq!(ids[0].as_u64(), Some(9_007_199_254_740_992));
        assert_eq!(ids[1].as_u64(), Some(u64::MAX));
    }

    #[test]
    fn test_round_trip_boundaries() {
        static SIGNED: Shape = Shape::Array(&Shape::Int64);
        static UNSIGNED: Shape = Shape::Array(&Shape::Uint64);

        let signed = vec![i64::MIN, -1, 0, 1, 9_007_199_254_740_993, i64::MAX];
        let wire = encode_as(&signed, &SIGNED).unwrap();
        assert_eq!(wire[0], json!("-9223372036854775808"));
        assert_eq!(wire[5], json!("9223372036854775807"));
        let back: Vec<i64> = decode_as(&wire, &SIGNED).unwrap();
        assert_eq!(back, signed);

        let unsigned = vec![0, 1u64 << 53, (1u64 << 53) + 1, u64::MAX];
        let wire = encode_as(&unsigned, &UNSIGNED).unwrap();
        assert_eq!(wire[3], json!("18446744073709551615"));
        let back: Vec<u64> = decode_as(&wire, &UNSIGNED).unwrap();
        assert_eq!(back, unsigned);
    }

    #[test]
    fn test_string_round_trip() {
        let text = to_string(&sample(), &BIG_INT_ARRAY_TEST).unwrap();
        let back: BigIntArrayTest = from_str(&text, &BIG_INT_ARRAY_TEST).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_does_not_mutate_input() {
        let original = serde_json::to_value(sample()).unwrap();
        let snapshot = original.clone();

        let wire = encode(&original, &BIG_INT_ARRAY_TEST).unwrap();
        let decoded = decode(&wire, &BIG_INT_ARRAY_TEST).unwrap();

        assert_eq!(original, snapshot);
        assert_eq!(decoded, snapshot);
        assert_ne!(wire, snapshot);
    }

    #[test]
    fn test_decode_out_of_range_names_field() {
        let wire = json!({
            "ids": [],
            "timestamps": [],
            "messages": [{"id": "18446744073709551616", "userId": "1", "timestamp": "1", "content": ""}]
        });
        let err = decode(&wire, &BIG_INT_ARRAY_TEST).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidInteger {
                path: "messages[0].id".to_string(),
                expected: "uint64",
                raw: "\"18446744073709551616\"".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_rejects_non_numeric_and_signed_unsigned() {
        let err = decode(&json!({"ids": ["12abc"]}), &IDS_ONLY).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInteger { ref path, .. } if path == "ids[0]"));

        let err = decode(&json!({"ids": ["-1"]}), &IDS_ONLY).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInteger { .. }));

        let err = decode(&json!({"ids": ["+1"]}), &IDS_ONLY).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInteger { .. }));

        let err = decode(&json!({"ids": [1.5]}), &IDS_ONLY).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInteger { .. }));
    }

    #[test]
    fn test_decode_accepts_plain_integers() {
        let native = decode(&json!({"ids": [7, "8"]}), &IDS_ONLY).unwrap();
        assert_eq!(native, json!({"ids": [7, 8]}));
    }

    #[test]
    fn test_optional_fields() {
        static USER: Shape = Shape::Object(&[
            Field::required("id", Shape::Uint64),
            Field::optional("createdAt", Shape::String),
        ]);

        assert_eq!(
            encode(&json!({"id": 1, "createdAt": null}), &USER).unwrap(),
            json!({"id": "1"})
        );
        assert_eq!(decode(&json!({"id": "1"}), &USER).unwrap(), json!({"id": 1}));

        let err = decode(&json!({"createdAt": "now"}), &USER).unwrap_err();
        assert_eq!(
            err,
            CodecError::MissingField {
                path: "id".to_string()
            }
        );
    }

    #[test]
    fn test_key_order_and_unknown_keys() {
        static PAIR: Shape = Shape::Object(&[
            Field::required("a", Shape::Int64),
            Field::required("b", Shape::Bool),
        ]);
        let native = decode(&json!({"extra": [1], "b": true, "a": "-5"}), &PAIR).unwrap();
        assert_eq!(native, json!({"a": -5, "b": true, "extra": [1]}));
    }

    #[test]
    fn test_enum_and_map_shapes() {
        static ROLE: Shape = Shape::Enum(&["USER", "ADMIN"]);
        static COUNTS: Shape = Shape::Map(&Shape::Int64);

        assert!(decode(&json!("ADMIN"), &ROLE).is_ok());
        assert_eq!(
            decode(&json!("ROOT"), &ROLE).unwrap_err(),
            CodecError::UnknownVariant {
                path: "value".to_string(),
                raw: "ROOT".to_string()
            }
        );

        let wire = encode(&json!({"USER": 3, "ADMIN": -1}), &COUNTS).unwrap();
        assert_eq!(wire, json!({"USER": "3", "ADMIN": "-1"}));
    }

    #[test]
    fn test_type_mismatch() {
        let err = decode(&json!({"ids": "1"}), &IDS_ONLY).unwrap_err();
        assert_eq!(err.to_string(), "ids: expected []uint64, got string");
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b"").unwrap(), json!({}));
        assert_eq!(parse_body(b"  \n").unwrap(), json!({}));
        assert_eq!(parse_body(br#"{"a":1}"#).unwrap(), json!({"a": 1}));
        assert!(matches!(parse_body(b"{oops"), Err(CodecError::Syntax(_))));
    }
}
