//! Uniform success/failure values.
//!
//! Every outcome is either `{ "success": true, "payload": .. }` or
//! `{ "success": false, "error": .. }`. Functions in this crate construct,
//! classify, normalize, filter and clean values of that shape, so results
//! coming from heterogeneous code (raw values, native errors, already wrapped
//! outcomes) end up in one shape without ever being wrapped twice.
//!
//! ```rust
//! use outcome::{failure, get_successes, normalize_list_to_success, success};
//! use serde_json::json;
//!
//! let normalized = normalize_list_to_success(vec![json!(1), success(2), failure(3)]);
//! assert_eq!(normalized, vec![success(1), success(2), failure(3)]);
//!
//! let successes = get_successes(&normalized);
//! assert_eq!(successes, vec![&success(1), &success(2)]);
//! ```

mod cause;
mod error;
mod normalize;
mod outcome;
mod protocol;

pub use crate::{
    cause::{error_to_object, Cause, ErrorLike, NativeError, DEFAULT_NAME},
    error::{Error, Result},
    normalize::{
        get_failures, get_successes, normalize, normalize_list_to_failure,
        normalize_list_to_success, normalize_to_failure, normalize_to_success, Classify,
    },
    outcome::Outcome,
    protocol::{
        clean, failure, is_failure, is_protocol, is_success, success, ERROR, PAYLOAD, SUCCESS,
    },
};

/// `#[derive(ErrorLike)]` for error structs with named fields.
///
/// Generated code refers to this crate as `::outcome`, so the derive only
/// works when the dependency is not renamed in the user's `Cargo.toml`.
pub use macros::ErrorLike;

// Used by code generated by `#[derive(ErrorLike)]`.
#[doc(hidden)]
pub use serde;
#[doc(hidden)]
pub use serde_json;
