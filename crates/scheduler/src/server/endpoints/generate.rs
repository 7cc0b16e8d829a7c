//! Schedule generation over HTTP.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::generator::{self, ScheduleConfig, ScheduleError};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Converts ScheduleError to API response.
fn schedule_error_to_response(error: ScheduleError) -> Response {
    let (status, message) = match &error {
        ScheduleError::EmptyCourse { .. } => (
            StatusCode::BAD_REQUEST,
            "A course has no sections left after applying rules",
        ),
        ScheduleError::Config(_) => (StatusCode::BAD_REQUEST, "Invalid schedule configuration"),
        ScheduleError::DeadlineExceeded { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            "Schedule generation timed out",
        ),
    };

    ApiErrorType::from((status, message, Some(error.to_string()))).into_response()
}

/// POST /generate
///
/// Generates every schedule for the posted configuration against the catalog
/// loaded at startup. The search runs on a blocking thread and is cut off
/// after the configured timeout.
pub async fn post_generate(
    State(s): State<Arc<AppState>>,
    Json(config): Json<ScheduleConfig>,
) -> Response {
    info!(
        "POST /generate ({} courses, {} buffers)",
        config.courses.len(),
        config.buffers.len()
    );

    let deadline = Instant::now() + s.generate_timeout;
    let state = s.clone();
    let result = tokio::task::spawn_blocking(move || {
        generator::generate(&state.catalog, &config, Some(deadline))
    })
    .await;

    match result {
        Ok(Ok(generation)) => (
            StatusCode::OK,
            Json(json!({
                "count": generation.schedules.len(),
                "dropped": generation.dropped,
                "stats": generation.stats,
                "schedules": generation.schedules,
            })),
        )
            .into_response(),
        Ok(Err(e)) => {
            warn!("Schedule generation failed: {}", e);
            schedule_error_to_response(e)
        }
        Err(e) => {
            error!("Schedule generation task panicked: {}", e);
            ApiErrorType::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Schedule generation failed",
                Some(e.to_string()),
            ))
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogCourse;
    use serde_json::Value;
    use std::time::Duration;

    fn state() -> Arc<AppState> {
        let catalog: Vec<CatalogCourse> = serde_json::from_value(json!([
            { "code": "CSE 100", "sections": [
                { "sectionId": "A00", "meetings": [
                    { "day": "Mon", "start": "09:00:00", "end": "10:00:00", "meetingType": "class", "room": "CENTR 101" }
                ]},
                { "sectionId": "B00", "meetings": [
                    { "day": "Mon", "start": "14:00:00", "end": "15:00:00", "meetingType": "class", "room": "CENTR 101" }
                ]}
            ]}
        ]))
        .unwrap();

        Arc::new(AppState::new(catalog).with_timeout(Duration::from_secs(5)))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_ok() {
        let config: ScheduleConfig = serde_json::from_value(json!({
            "courses": ["CSE 100"],
            "buffers": [
                { "name": "Work", "startTime": "13:00", "endTime": "16:00", "days": ["Mon"] }
            ]
        }))
        .unwrap();

        let response = post_generate(State(state()), Json(config)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["schedules"][0]["meetings"][0]["section"], "A00");
    }

    #[tokio::test]
    async fn test_generate_empty_course_is_bad_request() {
        let config: ScheduleConfig = serde_json::from_value(json!({
            "noClassOn": ["Monday"]
        }))
        .unwrap();

        let response = post_generate(State(state()), Json(config)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["context"].as_str().unwrap().contains("CSE 100"));
    }

    #[tokio::test]
    async fn test_generate_unknown_course_is_bad_request() {
        let config: ScheduleConfig = serde_json::from_value(json!({
            "courses": ["CSE 999"]
        }))
        .unwrap();

        let response = post_generate(State(state()), Json(config)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_timeout_is_gateway_timeout() {
        let days = ["Mon", "Tue", "Wed", "Thu"];
        let courses: Vec<Value> = days
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let sections: Vec<Value> = (8..20)
                    .map(|hour| {
                        json!({
                            "sectionId": format!("S{hour}"),
                            "meetings": [{
                                "day": day,
                                "start": format!("{hour:02}:00:00"),
                                "end": format!("{hour:02}:50:00"),
                                "meetingType": "class",
                                "room": "CENTR 101"
                            }]
                        })
                    })
                    .collect();
                json!({ "code": format!("CSE {}", 100 + i), "sections": sections })
            })
            .collect();
        let catalog: Vec<CatalogCourse> = serde_json::from_value(Value::Array(courses)).unwrap();
        let state = Arc::new(AppState::new(catalog).with_timeout(Duration::ZERO));

        let response = post_generate(State(state), Json(ScheduleConfig::default())).await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Schedule generation timed out");
        assert!(body["context"].as_str().unwrap().contains("Deadline exceeded"));
    }
}
