//! JSON-safe representations of trigger values.

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt::Debug;
use std::panic::PanicHookInfo;

/// Serialize an error and its cause chain. The top entry carries the concrete
/// type name and a captured backtrace; causes are type-erased and carry
/// message only, nested recursively under `errors`.
pub fn from_error<E: Error + ?Sized>(err: &E) -> Value {
    let mut object = error_parts(short_type_name::<E>(), &err.to_string());
    object.insert(
        "stack".into(),
        Value::String(Backtrace::force_capture().to_string()),
    );
    if let Some(source) = err.source() {
        object.insert("errors".into(), Value::Array(vec![from_cause(source)]));
    }
    Value::Object(object)
}

/// Like [`from_error`], additionally copying the error's own serialized
/// fields (custom codes and the like) into the report.
pub fn from_error_with_details<E: Error + Serialize>(err: &E) -> Value {
    let mut value = from_error(err);
    if let (Value::Object(object), Ok(Value::Object(fields))) =
        (&mut value, serde_json::to_value(err))
    {
        for (key, field) in fields {
            object.entry(key).or_insert(field);
        }
    }
    value
}

fn from_cause(err: &(dyn Error + 'static)) -> Value {
    let mut object = error_parts("Error", &err.to_string());
    if let Some(source) = err.source() {
        object.insert("errors".into(), Value::Array(vec![from_cause(source)]));
    }
    Value::Object(object)
}

fn error_parts(name: &str, message: &str) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("name".into(), Value::String(name.into()));
    object.insert("message".into(), Value::String(message.into()));
    object
}

fn short_type_name<T: ?Sized>() -> &'static str {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("Error")
}

/// Serialize a panic: message (when the payload is a string), backtrace, and
/// the panic location.
pub fn from_panic(info: &PanicHookInfo<'_>) -> Value {
    let message = panic_message(info);
    let mut object = error_parts("panic", &message);
    object.insert(
        "stack".into(),
        Value::String(Backtrace::force_capture().to_string()),
    );
    if let Some(location) = info.location() {
        object.insert(
            "location".into(),
            json!({
                "file": location.file(),
                "line": location.line(),
                "column": location.column(),
            }),
        );
    }
    Value::Object(object)
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Pass arbitrary values through to JSON. Values that cannot be represented
/// as JSON degrade to their debug formatting instead of failing the report.
pub fn from_value<T: Serialize + Debug>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(format!("{value:?}")))
}

/// Empty payloads carry no diagnostic value and are not worth a prompt or a
/// network round trip.
pub fn is_trivial(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(object) => object.is_empty(),
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
