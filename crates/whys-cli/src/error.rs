//! Structured error bodies for failed commands.

use whys_core::enums::ErrorClass;
use whys_core::responses::ErrorBody;
use whys_engine::EngineError;

/// Describe a command failure. Engine errors keep their classification;
/// anything else (config, database open, lock) is internal.
#[must_use]
pub fn error_body(error: &anyhow::Error) -> ErrorBody {
    match error.downcast_ref::<EngineError>() {
        Some(engine) => ErrorBody {
            code: engine.code().to_string(),
            message: engine.to_string(),
            classification: engine.classification(),
        },
        None => ErrorBody {
            code: "InternalError".to_string(),
            message: format!("{error:#}"),
            classification: ErrorClass::InternalError,
        },
    }
}

/// Print the error body as JSON on stderr.
pub fn report(error: &anyhow::Error) {
    let body = error_body(error);
    match serde_json::to_string_pretty(&body) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("whys error: {error:#}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn engine_errors_keep_classification() {
        let error = anyhow::Error::new(EngineError::InvalidStep(
            "cannot finalize before 5 answers (2 recorded)".into(),
        ));
        let body = error_body(&error);
        assert_eq!(body.code, "InvalidStep");
        assert_eq!(body.classification, ErrorClass::InvalidStep);
        assert!(body.message.contains("2 recorded"));
    }

    #[test]
    fn other_errors_are_internal() {
        let error = anyhow::anyhow!("failed to open session database");
        let body = error_body(&error);
        assert_eq!(body.classification, ErrorClass::InternalError);
        assert_eq!(body.code, "InternalError");
    }

    #[test]
    fn body_serializes_snake_case_classification() {
        let error = anyhow::Error::new(EngineError::NotFound("rca-1".into()));
        let json = serde_json::to_value(error_body(&error)).unwrap();
        assert_eq!(json["classification"], "not_found");
    }
}
