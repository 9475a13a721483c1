//! Serialized execution results.

use async_graphql::{Response, ServerError};
use serde::Serialize;

use crate::schema::{DEBUG_MESSAGE_KEY, TRACE_KEY};

/// Which debug details to keep in serialized errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFlags {
    /// Keep the `debugMessage` extension.
    pub include_debug_message: bool,
    /// Keep the `trace` extension.
    pub include_trace: bool,
}

impl DebugFlags {
    /// Strip all debug details.
    pub const NONE: Self = Self {
        include_debug_message: false,
        include_trace: false,
    };

    /// Keep all debug details.
    pub const ALL: Self = Self {
        include_debug_message: true,
        include_trace: true,
    };

    /// Flags for the given debug mode.
    #[must_use]
    pub fn for_debug_mode(debug: bool) -> Self {
        if debug { Self::ALL } else { Self::NONE }
    }
}

/// GraphQL response in its JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl ExecutionResult {
    /// Converts an engine response, filtering error details by `flags`.
    #[must_use]
    pub fn from_response(resp: Response, flags: DebugFlags) -> Self {
        let data = serde_json::to_value(&resp.data).unwrap_or(serde_json::Value::Null);
        let data = if data.is_null() { None } else { Some(data) };

        let errors = resp
            .errors
            .into_iter()
            .map(|e| serialize_error(e, flags))
            .collect();

        let extensions = if resp.extensions.is_empty() {
            None
        } else {
            serde_json::to_value(&resp.extensions).ok()
        };

        Self {
            data,
            errors,
            extensions,
        }
    }

    /// Returns the result as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn serialize_error(error: ServerError, flags: DebugFlags) -> serde_json::Value {
    let mut error_obj = serde_json::json!({ "message": error.message });

    if !error.locations.is_empty() {
        error_obj["locations"] =
            serde_json::to_value(&error.locations).unwrap_or(serde_json::Value::Null);
    }
    if !error.path.is_empty() {
        error_obj["path"] = serde_json::to_value(&error.path).unwrap_or(serde_json::Value::Null);
    }

    let extensions = error
        .extensions
        .and_then(|ext| serde_json::to_value(ext).ok());
    if let Some(serde_json::Value::Object(mut ext)) = extensions {
        if !flags.include_debug_message {
            ext.remove(DEBUG_MESSAGE_KEY);
        }
        if !flags.include_trace {
            ext.remove(TRACE_KEY);
        }
        if !ext.is_empty() {
            error_obj["extensions"] = serde_json::Value::Object(ext);
        }
    }

    error_obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{ErrorExtensions, Pos, Value};
    use serde_json::json;

    fn annotated_error() -> ServerError {
        let err = async_graphql::Error::new("boom").extend_with(|_, ext| {
            ext.set(DEBUG_MESSAGE_KEY, Value::String("boom".into()));
            ext.set(TRACE_KEY, Value::List(vec![Value::String("R::m (m)".into())]));
            ext.set("code", Value::String("FAILED".into()));
        });
        err.into_server_error(Pos { line: 1, column: 3 })
    }

    #[test]
    fn test_flags_for_debug_mode() {
        assert_eq!(DebugFlags::for_debug_mode(true), DebugFlags::ALL);
        assert_eq!(DebugFlags::for_debug_mode(false), DebugFlags::NONE);
        assert_eq!(DebugFlags::default(), DebugFlags::NONE);
    }

    #[test]
    fn test_debug_extensions_stripped() {
        let resp = Response::from_errors(vec![annotated_error()]);
        let result = ExecutionResult::from_response(resp, DebugFlags::NONE);

        assert!(result.data.is_none());
        assert_eq!(
            result.errors,
            [json!({
                "message": "boom",
                "locations": [{"line": 1, "column": 3}],
                "extensions": {"code": "FAILED"}
            })]
        );
    }

    #[test]
    fn test_debug_extensions_kept() {
        let resp = Response::from_errors(vec![annotated_error()]);
        let result = ExecutionResult::from_response(resp, DebugFlags::ALL);

        let ext = &result.errors[0]["extensions"];
        assert_eq!(ext[DEBUG_MESSAGE_KEY], "boom");
        assert_eq!(ext[TRACE_KEY], json!(["R::m (m)"]));
    }

    #[test]
    fn test_only_trace_kept() {
        let resp = Response::from_errors(vec![annotated_error()]);
        let flags = DebugFlags {
            include_debug_message: false,
            include_trace: true,
        };
        let result = ExecutionResult::from_response(resp, flags);

        let ext = result.errors[0]["extensions"].as_object().unwrap();
        assert!(!ext.contains_key(DEBUG_MESSAGE_KEY));
        assert!(ext.contains_key(TRACE_KEY));
    }

    #[test]
    fn test_data_only() {
        let resp = Response::new(Value::from_json(json!({"ping": "pong"})).unwrap());
        let result = ExecutionResult::from_response(resp, DebugFlags::NONE);
        assert_eq!(result.to_json(), json!({"data": {"ping": "pong"}}));
    }
}
