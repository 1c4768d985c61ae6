use serde::Serialize;

/// Uniform `{success, message, data}` body used by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_only_serializes_null_data() {
        let body = serde_json::to_value(ApiResponse::message("ok")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "ok", "data": null}));
    }

    #[test]
    fn error_is_unsuccessful() {
        let body = serde_json::to_value(ApiResponse::error("nope")).unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["data"], json!(null));
    }
}
