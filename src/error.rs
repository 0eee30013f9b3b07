use serde_json::json;
use thiserror::Error;

pub type EmailResult<T> = Result<T, EmailError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmailError {
    #[error("Missing required property '{property}' for component '{component}'")]
    MissingProperty {
        component: String,
        property: String,
    },

    #[error("Invalid property '{property}' for component '{component}': {reason}")]
    InvalidProperty {
        component: String,
        property: String,
        reason: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid node at {path}: {reason}")]
    InvalidNode { path: String, reason: String },

    #[error("Unsupported value for '{property}': expected a string or number, got {kind}")]
    UnsupportedStyleValue { property: String, kind: String },

    #[error("Render overflow: {reason} (limit {limit})")]
    RenderOverflow { limit: usize, reason: String },

    #[error("JSON error: {0}")]
    Json(String),
}

/// Coarse classification used at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidNode,
    UnsupportedStyleValue,
    RenderOverflow,
    Malformed,
}

impl EmailError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EmailError::MissingProperty { .. }
            | EmailError::InvalidProperty { .. }
            | EmailError::ValidationError(_) => ErrorKind::Validation,
            EmailError::InvalidNode { .. } => ErrorKind::InvalidNode,
            EmailError::UnsupportedStyleValue { .. } => ErrorKind::UnsupportedStyleValue,
            EmailError::RenderOverflow { .. } => ErrorKind::RenderOverflow,
            EmailError::Json(_) => ErrorKind::Malformed,
        }
    }

    /// True when the caller sent bad input and must change it before retrying.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::InvalidNode | ErrorKind::Malformed
        )
    }

    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// JSON body an HTTP shell sends alongside [`EmailError::status_code`].
    pub fn response_body(&self) -> serde_json::Value {
        if self.is_client_error() {
            json!({ "error": "Validation error", "details": self.to_string() })
        } else {
            json!({ "error": "Internal server error", "message": self.to_string() })
        }
    }

    pub(crate) fn invalid_property(
        component: &str,
        property: &str,
        reason: impl Into<String>,
    ) -> Self {
        EmailError::InvalidProperty {
            component: component.to_string(),
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EmailError {
    fn from(err: serde_json::Error) -> Self {
        EmailError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_400() {
        let err = EmailError::MissingProperty {
            component: "button".to_string(),
            property: "href".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), 400);
        let body = err.response_body();
        assert_eq!(body["error"], "Validation error");
        assert_eq!(
            body["details"],
            "Missing required property 'href' for component 'button'"
        );
    }

    #[test]
    fn test_invalid_node_is_client_error() {
        let err = EmailError::InvalidNode {
            path: "component.children[0]".to_string(),
            reason: "missing 'type'".to_string(),
        };
        assert!(err.is_client_error());
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_overflow_maps_to_500() {
        let err = EmailError::RenderOverflow {
            limit: 64,
            reason: "tree depth".to_string(),
        };
        assert!(!err.is_client_error());
        assert_eq!(err.status_code(), 500);
        let body = err.response_body();
        assert_eq!(body["error"], "Internal server error");
        assert!(body["message"].as_str().unwrap().contains("tree depth"));
    }

    #[test]
    fn test_unsupported_style_value_maps_to_500() {
        let err = EmailError::UnsupportedStyleValue {
            property: "color".to_string(),
            kind: "object".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::UnsupportedStyleValue);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_json_error_conversion() {
        let err: EmailError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert_eq!(err.status_code(), 400);
    }
}
