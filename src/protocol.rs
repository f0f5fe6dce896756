use log::debug;
use serde_json::{Map, Value};

use crate::{
    cause::Cause,
    error::{Error, Result},
};

/// Discriminant field.
pub const SUCCESS: &str = "success";

/// Field holding successful result.
pub const PAYLOAD: &str = "payload";

/// Field holding failure's error.
pub const ERROR: &str = "error";

/// Returns `{ "success": true, "payload": payload }`.
///
/// ```rust
/// use outcome::success;
/// use serde_json::json;
///
/// assert_eq!(success(32), json!({ "success": true, "payload": 32 }));
/// assert_eq!(success(()), json!({ "success": true, "payload": null }));
/// ```
pub fn success<P>(payload: P) -> Value
where
    P: Into<Value>,
{
    tagged(true, payload.into())
}

/// Returns `{ "success": false, "error": error }`, strings become
/// `{ "message": .. }` and native errors plain objects.
///
/// ```rust
/// use outcome::failure;
/// use serde_json::json;
///
/// assert_eq!(
///     failure("oops"),
///     json!({ "success": false, "error": { "message": "oops" } })
/// );
/// assert_eq!(failure(1), json!({ "success": false, "error": 1 }));
/// ```
pub fn failure<C>(err: C) -> Value
where
    C: Into<Cause>,
{
    tagged(false, err.into().into_value())
}

/// True only when `success` field is boolean `true`.
pub fn is_success(value: &Value) -> bool {
    matches!(value.get(SUCCESS), Some(Value::Bool(true)))
}

/// True only when `success` field is boolean `false`.
pub fn is_failure(value: &Value) -> bool {
    matches!(value.get(SUCCESS), Some(Value::Bool(false)))
}

/// Structural check for values coming from outside: object with `success`
/// and at least one of `payload` or `error`. Extra fields are fine.
pub fn is_protocol(value: &Value) -> bool {
    match value.as_object() {
        Some(object) => {
            object.contains_key(SUCCESS)
                && (object.contains_key(PAYLOAD) || object.contains_key(ERROR))
        }
        None => false,
    }
}

/// Strips everything except `success` and `payload` (or `error` for
/// failures).
///
/// Fails with `Error::InvalidArgument` on values that are not protocol
/// values or whose discriminant is not a boolean.
pub fn clean(value: &Value) -> Result<Value> {
    if !is_protocol(value) {
        debug!("clean - rejected non protocol value: {}", value);
        return Err(Error::InvalidArgument(format!(
            "expected protocol value, got {}",
            value
        )));
    }

    let field = |key: &str| value.get(key).cloned().unwrap_or(Value::Null);

    match value.get(SUCCESS) {
        Some(Value::Bool(true)) => Ok(tagged(true, field(PAYLOAD))),
        Some(Value::Bool(false)) => Ok(tagged(false, field(ERROR))),
        other => {
            debug!("clean - rejected discriminant: {:?}", other);
            Err(Error::InvalidArgument(format!(
                "`{}` has to be a boolean, got {:?}",
                SUCCESS, other
            )))
        }
    }
}

/// Builds canonical two field object without any coercion.
pub(crate) fn tagged(success: bool, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(SUCCESS.into(), Value::Bool(success));
    object.insert(if success { PAYLOAD } else { ERROR }.into(), value);
    Value::Object(object)
}
