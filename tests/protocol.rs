use std::{collections::HashMap, fmt};

use anyhow::anyhow;
use outcome::{
    clean, error_to_object, failure, is_failure, is_protocol, is_success, success, Cause,
    Error, ErrorLike, NativeError,
};
use serde::Serialize;
use serde_json::{json, Value};
use tools::init_logger;


#[test]
fn test_success() {
    assert_eq!(success(32), json!({ "success": true, "payload": 32 }));
    assert_eq!(success(()), json!({ "success": true, "payload": null }));
    assert_eq!(
        success(json!([1, 2])),
        json!({ "success": true, "payload": [1, 2] })
    );
}

#[test]
fn test_failure() {
    let error = json!({ "message": "oops" });
    assert_eq!(
        failure(error.clone()),
        json!({ "success": false, "error": error })
    );

    assert_eq!(failure(()), json!({ "success": false, "error": null }));
    assert_eq!(failure(1), json!({ "success": false, "error": 1 }));
    assert_eq!(
        failure(vec![json!(1), json!("a")]),
        json!({ "success": false, "error": [1, "a"] })
    );
}

#[test]
fn test_failure_string_messages() {
    let expected = json!({ "success": false, "error": { "message": "oops" } });

    assert_eq!(failure("oops"), expected);
    assert_eq!(failure(String::from("oops")), expected);
    assert_eq!(failure(json!("oops")), expected);
    assert_eq!(failure(Cause::Message("oops".into())), expected);
}

#[test]
fn test_failure_converts_native_errors() {
    let err = NativeError::new("oops").with_field("someprop", 32);
    let stack = err.stack();

    assert_eq!(
        failure(err),
        json!({
            "success": false,
            "error": {
                "message": "oops",
                "name": "Error",
                "stack": stack,
                "someprop": 32
            }
        })
    );
}

#[test]
fn test_failure_converts_fields_set_after_construction() {
    let mut err = NativeError::named("TypeError", "bad input");
    err.set_field("field", "age").set_field("code", 400);
    let stack = err.stack();

    assert_eq!(
        failure(err),
        json!({
            "success": false,
            "error": {
                "message": "bad input",
                "name": "TypeError",
                "stack": stack,
                "field": "age",
                "code": 400
            }
        })
    );
}

#[derive(Debug)]
struct ReadError {
    source: std::num::ParseIntError,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("could not read counter")
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[test]
fn test_native_error_from_std_error() -> anyhow::Result<()> {
    let parse = match "x".parse::<i32>() {
        Ok(_) => anyhow::bail!("expected parse error"),
        Err(err) => err,
    };
    let native = NativeError::from_error(&parse);

    assert_eq!(native.name(), "ParseIntError");
    assert_eq!(native.message(), "invalid digit found in string");
    assert!(native.fields().is_empty());

    let read = ReadError { source: parse };
    let object = error_to_object(&NativeError::from_error(&read));

    assert_eq!(object["name"], "ReadError");
    assert_eq!(object["message"], "could not read counter");
    assert_eq!(
        object["cause"],
        json!({ "message": "invalid digit found in string" })
    );

    Ok(())
}

#[test]
fn test_failure_converts_anyhow_errors() {
    let err = anyhow!("disk full").context("saving report");
    let stack = err.backtrace().to_string();

    assert_eq!(
        failure(err),
        json!({
            "success": false,
            "error": {
                "message": "saving report",
                "name": "Error",
                "stack": stack,
                "cause": { "message": "disk full" }
            }
        })
    );
}

#[derive(Debug, Serialize)]
struct Limits {
    max: u32,
}

#[derive(Debug, ErrorLike)]
struct QuotaExceeded {
    used: u32,
    limits: Limits,
    #[error_like(stack)]
    trace: String,
    #[error_like(skip)]
    #[allow(dead_code)]
    token: String,
}

impl fmt::Display for QuotaExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quota exceeded: {} of {}", self.used, self.limits.max)
    }
}

#[test]
fn test_failure_converts_derived_errors() {
    let err = QuotaExceeded {
        used: 12,
        limits: Limits { max: 10 },
        trace: String::from("at upload"),
        token: String::from("secret"),
    };

    assert_eq!(err.name(), "QuotaExceeded");
    assert_eq!(
        failure(err),
        json!({
            "success": false,
            "error": {
                "message": "quota exceeded: 12 of 10",
                "name": "QuotaExceeded",
                "stack": "at upload",
                "used": 12,
                "limits": { "max": 10 }
            }
        })
    );
}

#[derive(Debug, ErrorLike)]
struct Grid {
    cells: HashMap<(u8, u8), u8>,
    size: u8,
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("grid")
    }
}

#[test]
fn test_failure_keeps_unserializable_fields() {
    let mut cells = HashMap::new();
    cells.insert((0, 1), 7);

    let failed = failure(Grid { cells, size: 3 });
    let error = &failed["error"];

    assert_eq!(error["message"], "grid");
    assert_eq!(error["name"], "Grid");
    assert_eq!(error["size"], 3);
    match error.get("cells") {
        Some(Value::String(cells)) => assert!(
            cells.starts_with("unserializable field:"),
            "unexpected cells value: {}",
            cells
        ),
        other => panic!("expected cells to be kept as string, got {:?}", other),
    }
}

#[test]
fn test_is_success() {
    assert!(is_success(&success(())));
    assert!(is_success(&success(json!("anything"))));
    assert!(!is_success(&failure(())));
    assert!(!is_success(&json!({ "success": 1, "payload": 1 })));
    assert!(!is_success(&json!({ "success": "true" })));
    assert!(!is_success(&Value::Null));
    assert!(!is_success(&json!([true])));
}

#[test]
fn test_is_failure() {
    assert!(is_failure(&failure(())));
    assert!(is_failure(&failure("oops")));
    assert!(!is_failure(&success(())));
    assert!(!is_failure(&json!({ "success": 0, "error": 1 })));
    assert!(!is_failure(&json!({ "success": null })));
    assert!(!is_failure(&Value::Null));
}

#[test]
fn test_is_protocol() {
    assert!(is_protocol(&success(())));
    assert!(is_protocol(&failure(())));
    assert!(is_protocol(
        &json!({ "success": true, "payload": null, "meta": {} })
    ));
    assert!(is_protocol(
        &json!({ "success": false, "payload": 1, "error": 2 })
    ));

    assert!(!is_protocol(&Value::Null));
    assert!(!is_protocol(&json!({})));
    assert!(!is_protocol(&json!({ "success": true })));
    assert!(!is_protocol(&json!({ "payload": 1, "error": 2 })));
    assert!(!is_protocol(&json!(0)));
    assert!(!is_protocol(&json!("success")));
    assert!(!is_protocol(&json!([{ "success": true, "payload": 1 }])));
}

#[test]
fn test_clean() -> anyhow::Result<()> {
    init_logger();

    let mut s = success(1);
    s["meta"] = json!({ "foo": "bar" });
    assert_eq!(clean(&s)?, json!({ "success": true, "payload": 1 }));

    let mut f = failure(1);
    f["meta"] = json!({ "foo": "bar" });
    assert_eq!(clean(&f)?, json!({ "success": false, "error": 1 }));

    // The original value stays untouched.
    assert_eq!(s["meta"], json!({ "foo": "bar" }));

    Ok(())
}

#[test]
fn test_clean_keeps_only_relevant_side() -> anyhow::Result<()> {
    let both = json!({ "success": false, "payload": 1, "error": 2 });
    assert_eq!(clean(&both)?, json!({ "success": false, "error": 2 }));

    let success_without_payload = json!({ "success": true, "error": 2 });
    assert_eq!(
        clean(&success_without_payload)?,
        json!({ "success": true, "payload": null })
    );

    let failure_without_error = json!({ "success": false, "payload": 1 });
    assert_eq!(
        clean(&failure_without_error)?,
        json!({ "success": false, "error": null })
    );

    Ok(())
}

#[test]
fn test_clean_rejects_invalid_arguments() {
    init_logger();

    for value in [
        Value::Null,
        json!({}),
        json!({ "success": true }),
        json!(1),
        json!({ "success": "yes", "payload": 1 }),
    ] {
        assert!(
            matches!(clean(&value), Err(Error::InvalidArgument(_))),
            "expected invalid argument for {}",
            value
        );
    }
}
