use std::{
    backtrace::Backtrace,
    fmt::{self, Display},
};

use serde_json::{Map, Value};

/// Type name reported for errors that carry no more specific one.
pub const DEFAULT_NAME: &str = "Error";

/// Capability every native error has to expose before it can be turned
/// into a plain error object.
///
/// Implemented for [`NativeError`] and `anyhow::Error`, and derivable for
/// own error structs with `#[derive(ErrorLike)]`.
pub trait ErrorLike {
    /// Human readable message.
    fn message(&self) -> String;

    /// Stack trace captured when the error was created.
    fn stack(&self) -> String;

    /// Type name of the error.
    fn name(&self) -> String;

    /// Ad hoc fields attached to the error instance.
    fn fields(&self) -> Map<String, Value> {
        Map::new()
    }
}

/// Converts error into plain mapping with `message`, `stack`, every ad hoc
/// field and `name`.
///
/// `name` taken from the fields wins over the type name, `message` and
/// `stack` always come from the error itself.
pub fn error_to_object<E>(err: &E) -> Map<String, Value>
where
    E: ErrorLike + ?Sized,
{
    let mut object = err.fields();

    object.insert("message".into(), Value::String(err.message()));
    object.insert("stack".into(), Value::String(err.stack()));

    if !object.contains_key("name") {
        object.insert("name".into(), Value::String(err.name()));
    }
    object
}

/// Anything `failure` accepts, before it gets coerced into error value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cause {
    /// Bare message, becomes `{ "message": .. }`.
    Message(String),

    /// Already coerced native error.
    Error(Map<String, Value>),

    /// Plain data, passed through unless it is a JSON string.
    Value(Value),
}

impl Cause {
    pub fn from_error<E>(err: &E) -> Self
    where
        E: ErrorLike + ?Sized,
    {
        Cause::Error(error_to_object(err))
    }

    /// Returns error value that ends up under `error` field.
    pub fn into_value(self) -> Value {
        match self {
            Cause::Message(message) | Cause::Value(Value::String(message)) => {
                message_object(message)
            }
            Cause::Error(object) => Value::Object(object),
            Cause::Value(value) => value,
        }
    }
}

impl Default for Cause {
    fn default() -> Self {
        Cause::Value(Value::Null)
    }
}

impl<'a> From<&'a str> for Cause {
    fn from(message: &'a str) -> Self {
        Cause::Message(message.to_string())
    }
}

impl From<String> for Cause {
    fn from(message: String) -> Self {
        Cause::Message(message)
    }
}

impl From<Value> for Cause {
    fn from(value: Value) -> Self {
        Cause::Value(value)
    }
}

impl From<NativeError> for Cause {
    fn from(err: NativeError) -> Self {
        Cause::from_error(&err)
    }
}

impl From<anyhow::Error> for Cause {
    fn from(err: anyhow::Error) -> Self {
        Cause::from_error(&err)
    }
}

/// Macro for plain data types that go through `Value` unchanged.
macro_rules! cause_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Cause {
                fn from(value: $ty) -> Self {
                    Cause::Value(Value::from(value))
                }
            }
        )*
    };
}

cause_from_value!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    Vec<Value>,
    Option<Value>,
    Map<String, Value>,
);

/// Concrete native error. Captures stack at construction and allows
/// attaching ad hoc fields later on.
///
/// The stack is captured with `Backtrace::capture`, so unless
/// `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enables it, `stack` holds the
/// `disabled backtrace` placeholder.
///
/// ```rust
/// use outcome::{failure, NativeError};
///
/// let err = NativeError::new("oops").with_field("someprop", 32);
/// let failed = failure(err);
///
/// assert_eq!(failed["error"]["someprop"], 32);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NativeError {
    name: String,
    message: String,
    stack: String,
    fields: Map<String, Value>,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::named(DEFAULT_NAME, message)
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: Backtrace::capture().to_string(),
            fields: Map::new(),
        }
    }

    /// Adapts any std error. Name is the error's short type name, the
    /// message of its source (if any) is kept under `cause`.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut native = Self::named(short_type_name::<E>(), err.to_string());
        if let Some(source) = err.source() {
            native.set_field("cause", message_object(source.to_string()));
        }
        native
    }

    /// Attaches ad hoc field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(key, value);
        self
    }

    /// Attaches ad hoc field on already existing error.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

impl Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

impl std::error::Error for NativeError {}

impl ErrorLike for NativeError {
    fn message(&self) -> String {
        self.message.clone()
    }

    fn stack(&self) -> String {
        self.stack.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn fields(&self) -> Map<String, Value> {
        self.fields.clone()
    }
}

/// `anyhow::Error` erases its type, so it is always reported as `Error`.
/// The next error in the chain ends up under `cause`.
impl ErrorLike for anyhow::Error {
    fn message(&self) -> String {
        self.to_string()
    }

    fn stack(&self) -> String {
        self.backtrace().to_string()
    }

    fn name(&self) -> String {
        DEFAULT_NAME.to_string()
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(source) = self.chain().nth(1) {
            fields.insert("cause".into(), message_object(source.to_string()));
        }
        fields
    }
}

fn message_object(message: String) -> Value {
    let mut object = Map::new();
    object.insert("message".into(), Value::String(message));
    Value::Object(object)
}

/// `core::num::error::ParseIntError` -> `ParseIntError`,
/// `dyn core::error::Error + Send + Sync` -> `Error`.
fn short_type_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    let full = full
        .trim_start_matches('&')
        .trim_start_matches("mut ")
        .trim_start_matches("dyn ");
    // Auto trait bounds of trait objects come after the principal trait.
    let principal = full.split(" + ").next().unwrap_or(full);
    let without_generics = principal.split('<').next().unwrap_or(principal);

    match without_generics.rsplit("::").next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_NAME.to_string(),
    }
}
