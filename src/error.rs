use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("invalid {field}: {value:?}")]
    InvalidInput { field: &'static str, value: String },
    #[error(transparent)]
    PersistenceFailure(#[from] PersistenceError),
    #[error("unknown widget type '{0}'")]
    UnknownWidgetType(String),
    #[error("desktop layer unavailable: {0}")]
    PlatformCapabilityUnavailable(String),
}

impl WidgetError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed layout in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode layout: {0}")]
    Encode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_names_field_and_value() {
        let err = WidgetError::invalid("minutes", "abc");
        assert_eq!(err.to_string(), "invalid minutes: \"abc\"");
    }

    #[test]
    fn persistence_errors_convert_into_widget_errors() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: WidgetError = PersistenceError::Malformed {
            path: PathBuf::from("layout.json"),
            source,
        }
        .into();
        assert!(matches!(err, WidgetError::PersistenceFailure(_)));
        assert!(err.to_string().starts_with("malformed layout in layout.json"));
    }
}
