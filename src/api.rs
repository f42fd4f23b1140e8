//! HTTP surface: `GET /api/stories?count=N`.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::cancel::CancelToken;
use crate::error::StoriesError;
use crate::models::StoryDto;
use crate::service::HackerNewsService;

const DEFAULT_COUNT: i16 = 10;
const ERROR_TITLE: &str = "An error occurred while retrieving best stories";

pub struct AppState {
    pub service: HackerNewsService,
    // Cancelled on shutdown so in-flight aggregations stop waiting on the remote
    pub shutdown: CancelToken,
}

// Values outside i16 are rejected by the extractor with a 400
#[derive(Debug, Deserialize)]
pub struct StoriesQuery {
    #[serde(default = "default_count")]
    pub count: i16,
}

fn default_count() -> i16 {
    DEFAULT_COUNT
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(rename = "type")]
    pub kind: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/stories", web::get().to(get_stories));
}

pub async fn get_stories(state: web::Data<AppState>, query: web::Query<StoriesQuery>) -> HttpResponse {
    match state.service.get_best_stories(i64::from(query.count), &state.shutdown).await {
        Ok(stories) => {
            let body: Vec<StoryDto> = stories.iter().map(StoryDto::from).collect();
            HttpResponse::Ok().json(body)
        }
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &StoriesError) -> HttpResponse {
    if let StoriesError::InvalidArgument(message) = err {
        return HttpResponse::BadRequest().body(message.clone());
    }

    error!(error = %err, "{}", ERROR_TITLE);

    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
    let kind = match err {
        StoriesError::Transport { .. } => "HackerNewsClientException",
        _ => "GlobalExceptionHandler",
    };

    HttpResponse::build(status)
        .content_type("application/problem+json")
        .json(ProblemDetails {
            title: ERROR_TITLE.to_string(),
            status: status.as_u16(),
            detail: err.to_string(),
            kind: kind.to_string(),
        })
}
