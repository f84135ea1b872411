//! Input validation utilities.
//!
//! Song create and update requests share one payload shape:
//!
//! ```json
//! { "file": { "id": 3 } }
//! ```
//!
//! Validation works on the raw JSON value so that the error names the exact property that
//! is wrong. The message is sent back to the client unchanged.

use crate::{CoreError, CoreResult};
use serde_json::Value;

/// Validates a song create/update payload and returns the referenced file id.
///
/// # Errors
///
/// Returns `CoreError::Schema` describing the first structural problem found.
pub fn validate_song_payload(payload: &Value) -> CoreResult<i64> {
    let object = payload
        .as_object()
        .ok_or_else(|| schema_error("payload is not of type object"))?;

    let file = object
        .get("file")
        .ok_or_else(|| schema_error("missing required property 'file'"))?
        .as_object()
        .ok_or_else(|| schema_error("'file' is not of type object"))?;

    let id = file
        .get("id")
        .ok_or_else(|| schema_error("missing required property 'file.id'"))?;

    if !id.is_number() {
        return Err(schema_error("'file.id' is not of type number"));
    }

    id.as_i64()
        .or_else(|| {
            id.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        })
        .ok_or_else(|| schema_error("'file.id' must be an integer"))
}

fn schema_error(message: &str) -> CoreError {
    CoreError::Schema(message.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(payload: Value) -> String {
        match validate_song_payload(&payload) {
            Err(CoreError::Schema(msg)) => msg,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_valid_payload() {
        assert_eq!(validate_song_payload(&json!({"file": {"id": 7}})).unwrap(), 7);
    }

    #[test]
    fn test_accepts_integral_float_and_extra_properties() {
        let payload = json!({"file": {"id": 3.0, "name": "ignored"}, "extra": true});
        assert_eq!(validate_song_payload(&payload).unwrap(), 3);
    }

    #[test]
    fn test_rejects_non_object_payload() {
        assert_eq!(message(json!([1, 2])), "payload is not of type object");
        assert_eq!(message(json!("file")), "payload is not of type object");
    }

    #[test]
    fn test_rejects_missing_file() {
        assert_eq!(message(json!({})), "missing required property 'file'");
        assert_eq!(
            message(json!({"song": {"id": 1}})),
            "missing required property 'file'"
        );
    }

    #[test]
    fn test_rejects_file_of_wrong_type() {
        assert_eq!(message(json!({"file": 1})), "'file' is not of type object");
    }

    #[test]
    fn test_rejects_missing_id() {
        assert_eq!(
            message(json!({"file": {}})),
            "missing required property 'file.id'"
        );
    }

    #[test]
    fn test_rejects_non_numeric_id() {
        assert_eq!(
            message(json!({"file": {"id": "1"}})),
            "'file.id' is not of type number"
        );
        assert_eq!(
            message(json!({"file": {"id": null}})),
            "'file.id' is not of type number"
        );
    }

    #[test]
    fn test_rejects_fractional_id() {
        assert_eq!(
            message(json!({"file": {"id": 1.5}})),
            "'file.id' must be an integer"
        );
    }
}
