#![cfg(feature = "serde")]

use catch_error::{catch, throw, Caught, Kind, Value};
use std::panic::panic_any;

#[test]
fn serialize_propagated_error() {
    let err = catch(|| -> () { throw(Caught::msg("bad")) }).unwrap_err();
    let json = serde_json::to_value(&err).unwrap();

    assert_eq!(json["kind"], "propagated");
    assert_eq!(json["message"], "bad");
    assert!(json.get("thrown").is_none());
    let trace = json["trace"].as_array().unwrap();
    assert_eq!(trace.len(), 2);
    assert!(trace[0]["file"].as_str().unwrap().ends_with("serde.rs"));
}

#[test]
fn serialize_foreign_error_keeps_scalar() {
    let err = catch(|| -> () { panic_any(7_i32) }).unwrap_err();
    let json = serde_json::to_value(&err).unwrap();

    assert_eq!(json["kind"], "foreign");
    assert_eq!(json["thrown"], 7);
    assert_eq!(json["message"], "Non-error value thrown: 7");
}

#[test]
fn round_trip() {
    let err = catch(|| -> () { panic_any("oops") }).unwrap_err();
    let json = serde_json::to_string(&err).unwrap();
    let back: Caught = serde_json::from_str(&json).unwrap();

    assert_eq!(back.kind(), Kind::Foreign);
    assert_eq!(back.message(), err.message());
    assert_eq!(back.thrown(), Some(&Value::String("oops".into())));
    assert_eq!(back.depth(), err.depth());
    assert!(back.into_payload().is_none());
}

#[test]
fn deserialize_minimal() {
    let back: Caught = serde_json::from_str(r#"{"kind":"propagated","message":"remote failure"}"#).unwrap();
    assert_eq!(back.message(), "remote failure");
    assert_eq!(back.depth(), 0);
    assert!(!back.is_foreign());
}

#[test]
fn frame_view_serializes() {
    let err = Caught::msg("x").frame("src/lib.rs", 3, 9);
    let frame = err.frames().next().unwrap();
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json, serde_json::json!({ "file": "src/lib.rs", "line": 3, "col": 9 }));
}
