//! Axum route handlers for the conversion API.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use tracing::debug;

use crate::convert::{convert, ConvertError, ConvertOptions};
use crate::parse::ParseError;

use super::error::AppError;
use super::types::{ConvertRequest, ConvertResponse};
use super::AppState;

/// `GET /` serves the landing page.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.landing_page.clone())
}

/// `POST /data` converts an ABC tune.
///
/// Recognized conversion failures answer 200 with the failure in `error`;
/// only faults inside the service surface as 500.
pub async fn convert_handler(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError> {
    let options = ConvertOptions {
        has_pickup: request.args.has_pickup,
    };
    match convert(&request.userdata, &options) {
        Ok(conversion) => Ok(Json(ConvertResponse::success(conversion))),
        Err(ConvertError::Parse(err)) => {
            debug!("conversion rejected: {}", err);
            Ok(Json(ConvertResponse::failure(user_message(&err))))
        }
        Err(err) => Err(AppError::internal(err.to_string())),
    }
}

/// The two failure strings the JSON API promises to its clients.
fn user_message(err: &ParseError) -> &'static str {
    match err {
        ParseError::EmptyInput => "Converter cannot parse empty string",
        ParseError::Syntax { .. } => "Invalid syntax. Unable to convert.",
    }
}
