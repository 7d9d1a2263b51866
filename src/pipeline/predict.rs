//! Ad-hoc predictions against the trained model from the last run.

use serde_json::Value;
use thiserror::Error;

use super::types::{PredictRequest, PredictResponse, Record};
use crate::backend::{ServiceError, TrainingBackend};

/// Fallback message when the service supplies no failure detail.
pub const GENERIC_PREDICT_FAILURE: &str = "Prediction failed";

/// Prediction failures, local validation and service alike.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("Run a pipeline first to produce a model")]
    NoTrainedModel,
    #[error("Invalid JSON. Provide one record or an array of records")]
    InvalidJson,
    /// Service-side failure; the detail is surfaced verbatim.
    #[error("{detail}")]
    Service { detail: String },
}

/// Parse raw playground input into prediction records.
///
/// Accepts a single JSON object or an array of objects; a single object is
/// normalized to a one-element array. Anything else is rejected locally.
pub fn parse_records(raw: &str) -> Result<Vec<Record>, PredictError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| PredictError::InvalidJson)?;
    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(PredictError::InvalidJson),
            })
            .collect(),
        _ => Err(PredictError::InvalidJson),
    }
}

/// Validate preconditions and build the request, without any network call.
///
/// The model reference is checked before the input is parsed, so a missing
/// model is reported even for malformed input.
pub fn prepare_request(
    model_id: Option<&str>,
    raw: &str,
) -> Result<PredictRequest, PredictError> {
    let model_id = model_id.ok_or(PredictError::NoTrainedModel)?;
    let records = parse_records(raw)?;
    Ok(PredictRequest {
        model_id: model_id.to_string(),
        records,
    })
}

/// Interpret the service's answer; predictions stay aligned with the input
/// record order.
pub fn interpret(
    outcome: Result<PredictResponse, ServiceError>,
) -> Result<Vec<Value>, PredictError> {
    match outcome {
        Ok(response) => Ok(response.predictions),
        Err(error) => Err(PredictError::Service {
            detail: error
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_PREDICT_FAILURE.to_string()),
        }),
    }
}

/// Run a prediction synchronously: validate, dispatch, interpret.
pub fn predict(
    model_id: Option<&str>,
    raw: &str,
    backend: &dyn TrainingBackend,
) -> Result<Vec<Value>, PredictError> {
    let request = prepare_request(model_id, raw)?;
    interpret(backend.predict(&request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{RunOutcome, RunRequest};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        calls: AtomicUsize,
        response: Result<PredictResponse, ServiceError>,
    }

    impl TrainingBackend for CountingBackend {
        fn run_pipeline(&self, _request: &RunRequest) -> Result<RunOutcome, ServiceError> {
            unreachable!("prediction tests never run pipelines");
        }

        fn predict(&self, _request: &PredictRequest) -> Result<PredictResponse, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    #[test]
    fn single_object_becomes_one_record() {
        let records = parse_records(r#"{"f": 1, "g": 0.2}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["f"], json!(1));
    }

    #[test]
    fn array_of_objects_keeps_order() {
        let records = parse_records(r#"[{"f": 1}, {"f": 2}, {"f": 3}]"#).unwrap();
        let values: Vec<_> = records.iter().map(|r| r["f"].clone()).collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn malformed_and_non_record_json_is_rejected() {
        assert_eq!(parse_records("{").unwrap_err(), PredictError::InvalidJson);
        assert_eq!(parse_records("42").unwrap_err(), PredictError::InvalidJson);
        assert_eq!(
            parse_records(r#"[1, 2]"#).unwrap_err(),
            PredictError::InvalidJson
        );
    }

    #[test]
    fn missing_model_reference_fails_without_network_call() {
        let backend = CountingBackend {
            calls: AtomicUsize::new(0),
            response: Ok(PredictResponse {
                predictions: vec![json!("a")],
            }),
        };
        let err = predict(None, r#"{"f": 1}"#, &backend).unwrap_err();
        assert_eq!(err, PredictError::NoTrainedModel);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn invalid_json_fails_without_network_call() {
        let backend = CountingBackend {
            calls: AtomicUsize::new(0),
            response: Ok(PredictResponse {
                predictions: vec![json!("a")],
            }),
        };
        let err = predict(Some("m-1"), "{", &backend).unwrap_err();
        assert_eq!(err, PredictError::InvalidJson);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn predictions_come_back_in_input_order() {
        let backend = CountingBackend {
            calls: AtomicUsize::new(0),
            response: Ok(PredictResponse {
                predictions: vec![json!("setosa"), json!("virginica")],
            }),
        };
        let predictions = predict(Some("m-1"), r#"[{"f": 1}, {"f": 2}]"#, &backend).unwrap();
        assert_eq!(predictions, vec![json!("setosa"), json!("virginica")]);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn service_detail_is_surfaced_verbatim() {
        let backend = CountingBackend {
            calls: AtomicUsize::new(0),
            response: Err(ServiceError::Api {
                status: 400,
                detail: Some("Model not found.".to_string()),
            }),
        };
        let err = predict(Some("m-gone"), r#"{"f": 1}"#, &backend).unwrap_err();
        assert_eq!(
            err,
            PredictError::Service {
                detail: "Model not found.".to_string()
            }
        );
    }

    #[test]
    fn transport_failure_uses_generic_detail() {
        let backend = CountingBackend {
            calls: AtomicUsize::new(0),
            response: Err(ServiceError::Transport("timed out".to_string())),
        };
        let err = predict(Some("m-1"), r#"{"f": 1}"#, &backend).unwrap_err();
        assert_eq!(
            err,
            PredictError::Service {
                detail: GENERIC_PREDICT_FAILURE.to_string()
            }
        );
    }
}
