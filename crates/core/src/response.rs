//! The uniform response envelope returned by every resource route.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Machine-readable error codes carried by failed envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MethodNotAllowed,
    BadRequest,
    #[serde(rename = "unauthorised")]
    Unauthorized,
    NotFound,
    Conflict,
    ServiceUnavailable,
    InternalError,
}

/// A success or error result with its status code and payload.
///
/// Envelopes are built once per request through the constructors below and
/// serialized as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub status_code: u16,
    pub message: Option<String>,
    pub error_code: Option<ErrorCode>,
    pub data: Option<Map<String, Value>>,
}

impl Envelope {
    fn ok(status_code: u16) -> Self {
        Self {
            success: true,
            status_code,
            message: None,
            error_code: None,
            data: None,
        }
    }

    fn error(status_code: u16, error_code: ErrorCode, message: Option<String>) -> Self {
        Self {
            success: false,
            status_code,
            message,
            error_code: Some(error_code),
            data: None,
        }
    }

    /// 200
    pub fn success(data: Map<String, Value>) -> Self {
        Self::ok(200).with_data(data)
    }

    /// 201
    pub fn created(data: Map<String, Value>) -> Self {
        Self::ok(201).with_data(data)
    }

    /// 405
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::error(405, ErrorCode::MethodNotAllowed, Some(message.into()))
    }

    /// 400
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(400, ErrorCode::BadRequest, Some(message.into()))
    }

    /// 401. The message of the failed check is passed through verbatim.
    pub fn unauthorized(message: Option<String>) -> Self {
        Self::error(401, ErrorCode::Unauthorized, message)
    }

    /// 404, with `data = {"id": id}`.
    pub fn not_found(id: &str) -> Self {
        let mut data = Map::new();
        data.insert("id".to_string(), Value::String(id.to_string()));
        Self::error(
            404,
            ErrorCode::NotFound,
            Some(format!("Object with id {id} cannot be found.")),
        )
        .with_data(data)
    }

    /// Any other failure, with the status chosen by the caller.
    pub fn failure(status_code: u16, error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self::error(status_code, error_code, Some(message.into()))
    }

    fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }
}

/// Builds a data mapping with a single entry.
pub fn data_with(key: &str, value: impl Into<Value>) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert(key.to_string(), value.into());
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_wire_format() {
        let envelope = Envelope::success(data_with("id", "42"));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": true,
                "status_code": 200,
                "message": null,
                "error_code": null,
                "data": {"id": "42"}
            })
        );
    }

    #[test]
    fn test_created_status() {
        let envelope = Envelope::created(Map::new());
        assert!(envelope.success);
        assert_eq!(envelope.status_code, 201);
    }

    #[test]
    fn test_error_codes_on_the_wire() {
        let cases = [
            (Envelope::method_not_allowed("x"), 405, "method_not_allowed"),
            (Envelope::bad_request("x"), 400, "bad_request"),
            (Envelope::unauthorized(None), 401, "unauthorised"),
            (Envelope::not_found("7"), 404, "not_found"),
        ];

        for (envelope, status, code) in cases {
            let wire = serde_json::to_value(&envelope).unwrap();
            assert_eq!(wire["success"], json!(false));
            assert_eq!(wire["status_code"], json!(status));
            assert_eq!(wire["error_code"], json!(code));
        }
    }

    #[test]
    fn test_not_found_reports_404_with_id() {
        let envelope = Envelope::not_found("42");

        assert_eq!(envelope.status_code, 404);
        assert_eq!(
            envelope.message.as_deref(),
            Some("Object with id 42 cannot be found.")
        );
        assert_eq!(envelope.data, Some(data_with("id", "42")));
    }

    #[test]
    fn test_envelope_deserializes() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": false,
            "status_code": 401,
            "message": "nope",
            "error_code": "unauthorised",
            "data": null
        }))
        .unwrap();

        assert_eq!(envelope, Envelope::unauthorized(Some("nope".to_string())));
    }
}
