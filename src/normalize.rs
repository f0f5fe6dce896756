use log::trace;
use serde_json::Value;

use crate::protocol::{self, failure, is_protocol, success};

/// Implemented by everything batch filters can split into successes and
/// failures: raw protocol values and typed outcomes.
pub trait Classify {
    fn is_success(&self) -> bool;

    fn is_failure(&self) -> bool;
}

impl Classify for Value {
    fn is_success(&self) -> bool {
        protocol::is_success(self)
    }

    fn is_failure(&self) -> bool {
        protocol::is_failure(self)
    }
}

/// Returns `value` untouched when it already is a protocol value (of any
/// polarity), otherwise hands it to `wrap`.
///
/// ```rust
/// use outcome::{failure, normalize, success};
/// use serde_json::json;
///
/// let wrapped = normalize(success, json!(1));
/// assert_eq!(wrapped, success(1));
///
/// // Already compliant values are never wrapped again.
/// assert_eq!(normalize(success, failure(1)), failure(1));
/// ```
pub fn normalize<F>(wrap: F, value: Value) -> Value
where
    F: FnOnce(Value) -> Value,
{
    if is_protocol(&value) {
        trace!("normalize - passing through: {}", value);
        value
    } else {
        trace!("normalize - wrapping raw value: {}", value);
        wrap(value)
    }
}

pub fn normalize_to_success(value: Value) -> Value {
    normalize(success::<Value>, value)
}

pub fn normalize_to_failure(value: Value) -> Value {
    normalize(failure::<Value>, value)
}

/// Element-wise `normalize_to_success`, keeps order and length.
pub fn normalize_list_to_success<I>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    values.into_iter().map(normalize_to_success).collect()
}

/// Element-wise `normalize_to_failure`, keeps order and length.
pub fn normalize_list_to_failure<I>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    values.into_iter().map(normalize_to_failure).collect()
}

/// References to every success in original order.
pub fn get_successes<T>(values: &[T]) -> Vec<&T>
where
    T: Classify,
{
    values.iter().filter(|value| value.is_success()).collect()
}

/// References to every failure in original order.
pub fn get_failures<T>(values: &[T]) -> Vec<&T>
where
    T: Classify,
{
    values.iter().filter(|value| value.is_failure()).collect()
}
