use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::error::AppError;

use super::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use super::loader::ClassifierStatus;
use super::profile::CandidateProfile;
use super::session::{InferenceSession, ScreeningOutcome, SessionError, Verdict};
use super::views::{render_page, Banner};

/// Router exposing the form page and the JSON prediction API.
pub fn screening_router(session: Arc<InferenceSession>) -> Router {
    Router::new()
        .route("/", get(form_handler))
        .route("/predict", post(form_submit_handler))
        .route("/api/v1/predictions", post(predict_handler))
        .route("/api/v1/model", get(model_status_handler))
        .with_state(session)
}

/// JSON body returned for a scored candidate.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub verdict: Verdict,
    pub message: &'static str,
    pub features: FeatureVector,
    pub prediction: Vec<f64>,
    pub evaluated_at: DateTime<Utc>,
}

impl From<ScreeningOutcome> for PredictionView {
    fn from(outcome: ScreeningOutcome) -> Self {
        Self {
            verdict: outcome.verdict,
            message: outcome.verdict.message(),
            features: outcome.features,
            prediction: outcome.prediction,
            evaluated_at: outcome.evaluated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelStatusView {
    pub source: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub features: [&'static str; FEATURE_COUNT],
}

pub(crate) async fn form_handler(State(session): State<Arc<InferenceSession>>) -> Html<String> {
    let banner = session
        .load_classifier()
        .err()
        .map(|err| Banner::Error(err.user_message()));
    Html(render_page(&CandidateProfile::default(), banner.as_ref()))
}

pub(crate) async fn form_submit_handler(
    State(session): State<Arc<InferenceSession>>,
    Form(profile): Form<CandidateProfile>,
) -> Response {
    let (status, banner) = match session.submit(&profile) {
        Ok(outcome) => (StatusCode::OK, Banner::Verdict(outcome.verdict)),
        Err(SessionError::ModelUnavailable(err)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Banner::Error(err.user_message()),
        ),
        Err(SessionError::Profile(err)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Banner::Error(err.to_string()))
        }
        Err(SessionError::Prediction(err)) => {
            error!(error = %err, "prediction failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Banner::Error(err.to_string()))
        }
    };

    (status, Html(render_page(&profile, Some(&banner)))).into_response()
}

pub(crate) async fn predict_handler(
    State(session): State<Arc<InferenceSession>>,
    axum::Json(profile): axum::Json<CandidateProfile>,
) -> Result<axum::Json<PredictionView>, AppError> {
    let outcome = session.submit(&profile)?;
    Ok(axum::Json(PredictionView::from(outcome)))
}

pub(crate) async fn model_status_handler(
    State(session): State<Arc<InferenceSession>>,
) -> axum::Json<ModelStatusView> {
    let (status, reason) = match session.classifier_status() {
        ClassifierStatus::NotLoaded => ("not_loaded", None),
        ClassifierStatus::Loaded => ("loaded", None),
        ClassifierStatus::Failed(err) => ("unavailable", Some(err.user_message())),
    };

    axum::Json(ModelStatusView {
        source: session.model_source().to_string(),
        status,
        reason,
        features: FEATURE_NAMES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::loader::{ClassifierCache, ModelUnavailable};
    use crate::screening::model::{Classifier, PredictionError};
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    #[derive(Default)]
    struct Fixed {
        label: f64,
        calls: AtomicUsize,
    }

    impl Classifier for Fixed {
        fn predict(&self, _features: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![self.label])
        }
    }

    fn session_returning(label: f64) -> (Arc<InferenceSession>, Arc<Fixed>) {
        let classifier = Arc::new(Fixed {
            label,
            calls: AtomicUsize::new(0),
        });
        let cache = ClassifierCache::preloaded(classifier.clone());
        (Arc::new(InferenceSession::new(Arc::new(cache))), classifier)
    }

    fn missing_model_session() -> Arc<InferenceSession> {
        let cache = ClassifierCache::with_loader("models/recruitment_model.json", || {
            Err(ModelUnavailable::NotFound {
                path: PathBuf::from("models/recruitment_model.json"),
            })
        });
        Arc::new(InferenceSession::new(Arc::new(cache)))
    }

    fn scenario_form() -> &'static str {
        "city=city_2&city_development_index=0.5&gender=Male\
         &relevent_experience=Has+relevent+experience&enrolled_university=no_enrollment\
         &education_level=Graduate&major_discipline=STEM&experience=2\
         &company_size=Unknown&company_type=Unknown&last_new_job=1&training_hours=50"
    }

    async fn read_body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn form_submission_renders_the_verdict() {
        let (session, classifier) = session_returning(1.0);
        let response = screening_router(session)
            .oneshot(
                Request::post("/predict")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(scenario_form()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let html = read_body(response).await;
        assert!(html.contains("Candidate is likely to be accepted."));
        assert!(html.contains("<option value=\"city_2\" selected>city_2</option>"));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn form_submission_shows_only_the_load_error_when_model_missing() {
        let response = screening_router(missing_model_session())
            .oneshot(
                Request::post("/predict")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(scenario_form()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let html = read_body(response).await;
        assert!(html.contains("Model file not found."));
        assert!(!html.contains("likely"));
    }

    #[tokio::test]
    async fn form_page_surfaces_load_error_before_submission() {
        let html = form_handler(State(missing_model_session())).await.0;
        assert!(html.contains("banner error"));
        assert!(html.contains("models/recruitment_model.json"));
    }

    #[tokio::test]
    async fn unknown_option_values_are_rejected_by_the_form() {
        let (session, classifier) = session_returning(1.0);
        let body = scenario_form().replace("company_size=Unknown", "company_size=huge");
        let response = screening_router(session)
            .oneshot(
                Request::post("/predict")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn json_prediction_returns_vector_and_verdict() {
        let (session, _) = session_returning(0.0);
        let profile = CandidateProfile::default();

        let response = predict_handler(State(session), axum::Json(profile))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&read_body(response).await).expect("json body");
        assert_eq!(body["verdict"], "not_accepted");
        assert_eq!(body["message"], "Candidate is likely not to be accepted.");
        assert_eq!(body["features"].as_array().map(Vec::len), Some(FEATURE_COUNT));
        assert_eq!(body["prediction"][0], 0.0);
    }

    #[tokio::test]
    async fn json_prediction_maps_errors_to_status_codes() {
        let response = predict_handler(
            State(missing_model_session()),
            axum::Json(CandidateProfile::default()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let (session, classifier) = session_returning(1.0);
        let response = predict_handler(
            State(session),
            axum::Json(CandidateProfile {
                experience: 25,
                ..CandidateProfile::default()
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn model_status_reports_cache_state() {
        let session = missing_model_session();
        let axum::Json(before) = model_status_handler(State(session.clone())).await;
        assert_eq!(before.status, "not_loaded");
        assert_eq!(before.features[8], "company_size");

        let _ = session.load_classifier();
        let axum::Json(after) = model_status_handler(State(session)).await;
        assert_eq!(after.status, "unavailable");
        assert!(after.reason.is_some());
    }
}
