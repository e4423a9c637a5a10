use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use tracing::debug;

use super::{error, internal_server_error};
use crate::models::{contact::ApiContactRequest, ApiSuccess};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    request: Result<Json<ApiContactRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            debug!("rejecting contact request: {rejection}");
            return error(StatusCode::BAD_REQUEST, "Malformed request body");
        }
    };

    let (draft, honeypot) = request.into_draft();
    let message = match draft.validate() {
        Ok(message) => message,
        Err(errors) if errors.contains_required() => {
            return error(StatusCode::BAD_REQUEST, "Missing required fields");
        }
        Err(errors) => {
            let detail = errors
                .messages()
                .next()
                .map_or("Invalid request", |(_, message)| message);
            return error(StatusCode::BAD_REQUEST, detail);
        }
    };

    match service.send_message(message, honeypot).await {
        Ok(()) => Json(ApiSuccess { success: true }).into_response(),
        Err(ContactSendMessageError::Send) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message")
        }
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}
