use serde::{
    de::{DeserializeOwned, Error as _},
    ser::SerializeStruct,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

use crate::{
    error::Result,
    normalize::Classify,
    protocol::{clean, is_success, tagged, ERROR, PAYLOAD, SUCCESS},
};

/// Typed counterpart of protocol value, for code that already knows it
/// deals with outcomes.
///
/// Serializes to exactly `{ "success": true, "payload": .. }` or
/// `{ "success": false, "error": .. }`. Deserializes from any protocol
/// value, extra fields are dropped the same way `clean` drops them.
///
/// ```rust
/// use outcome::Outcome;
/// use serde_json::json;
///
/// let outcome: Outcome<i32, String> =
///     serde_json::from_value(json!({ "success": true, "payload": 1, "meta": {} }))?;
///
/// assert_eq!(outcome, Outcome::Success(1));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = Value, E = Value> {
    Success(T),
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Outcome::Success(payload) => Some(payload),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(payload) => Outcome::Success(f(payload)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    pub fn map_error<U, F>(self, f: F) -> Outcome<T, U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Outcome::Success(payload) => Outcome::Success(payload),
            Outcome::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, E> {
        self.into()
    }
}

impl<T, E> Outcome<T, E>
where
    T: Serialize,
    E: Serialize,
{
    /// Turns self into canonical protocol value.
    pub fn into_value(self) -> Result<Value> {
        Ok(match self {
            Outcome::Success(payload) => tagged(true, serde_json::to_value(payload)?),
            Outcome::Failure(error) => tagged(false, serde_json::to_value(error)?),
        })
    }
}

impl<T, E> Outcome<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    /// Reads typed outcome from any protocol value.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut cleaned = clean(&value)?;

        if is_success(&cleaned) {
            Ok(Outcome::Success(serde_json::from_value(
                cleaned[PAYLOAD].take(),
            )?))
        } else {
            Ok(Outcome::Failure(serde_json::from_value(cleaned[ERROR].take())?))
        }
    }
}

impl<T, E> Classify for Outcome<T, E> {
    fn is_success(&self) -> bool {
        Outcome::is_success(self)
    }

    fn is_failure(&self) -> bool {
        Outcome::is_failure(self)
    }
}

impl<T, E> From<std::result::Result<T, E>> for Outcome<T, E> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(error) => Outcome::Failure(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for std::result::Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Success(payload) => Ok(payload),
            Outcome::Failure(error) => Err(error),
        }
    }
}

impl<T, E> Serialize for Outcome<T, E>
where
    T: Serialize,
    E: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Success(payload) => {
                state.serialize_field(SUCCESS, &true)?;
                state.serialize_field(PAYLOAD, payload)?;
            }
            Outcome::Failure(error) => {
                state.serialize_field(SUCCESS, &false)?;
                state.serialize_field(ERROR, error)?;
            }
        }
        state.end()
    }
}

impl<'de, T, E> Deserialize<'de> for Outcome<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}
