//! The HTTP endpoint GitHub delivers webhooks to.
//!
//! Each delivery is checked (method, headers, signature), parsed into a
//! [`bridge::WebhookEvent`], and handed to [`bridge::dispatch`]. The
//! outcome maps onto the response:
//!
//! | Outcome | Response |
//! |---------|----------|
//! | handled, created a resource | `201 Created` + `Location`, JSON body |
//! | handled | `200 OK`, JSON body |
//! | ignored | `200 OK`, plain-text reason |
//! | error | the error's status, plain-text message |

use std::{future::Future, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use bridge::{dispatch, ActionResult, CardGateway, Outcome, WebhookEvent};
use tokio::net::TcpListener;
use tracing::{error, field, info, info_span, Instrument};
use uuid::Uuid;

use crate::{ListenerError, WebhookVerifier};

const SIGNATURE_HEADER: &str = "X-Hub-Signature";
const EVENT_HEADER: &str = "X-GitHub-Event";
const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// Shared state for the webhook endpoint.
#[derive(Clone)]
pub struct AppState {
    /// Where card actions are sent.
    pub gateway: Arc<dyn CardGateway>,
    /// Checks `X-Hub-Signature`.
    pub verifier: WebhookVerifier,
}

/// Builds the router. Deliveries are accepted at `/`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handle_webhook))
        .with_state(state)
}

/// Serves the webhook endpoint until `shutdown` resolves.
///
/// # Errors
///
/// Any I/O error from the underlying server.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// A delivery that passed method, header, and signature checks.
#[derive(Debug)]
struct Delivery<'a> {
    event: &'a str,
    id: &'a str,
}

async fn handle_webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = info_span!(
        "webhook",
        invocation = %Uuid::new_v4(),
        event = field::Empty,
        delivery = field::Empty,
    );

    async move {
        let user_agent = header_value(&headers, header::USER_AGENT.as_str()).unwrap_or("unknown");
        let event_name = header_value(&headers, EVENT_HEADER).unwrap_or_default().to_string();

        let result = handle_delivery(&state, &method, &headers, &body).await;
        match result {
            Ok(outcome) => outcome_response(&event_name, outcome),
            Err(e) => {
                let status = e.status_code();
                if status >= 500 {
                    error!(status, error = %e, user_agent, "Webhook delivery failed");
                } else {
                    info!(status, error = %e, user_agent, "Webhook delivery rejected");
                }
                error_response(&e)
            }
        }
    }
    .instrument(span)
    .await
}

async fn handle_delivery(
    state: &AppState,
    method: &Method,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Outcome, ListenerError> {
    let delivery = validate_delivery(&state.verifier, method, headers, body)?;

    let span = tracing::Span::current();
    span.record("event", delivery.event);
    span.record("delivery", delivery.id);
    info!("Received webhook delivery");

    let event = WebhookEvent::parse(delivery.event, body)?;
    Ok(dispatch(state.gateway.as_ref(), &event).await?)
}

/// Checks method, required headers, then the signature.
fn validate_delivery<'a>(
    verifier: &WebhookVerifier,
    method: &Method,
    headers: &'a HeaderMap,
    body: &[u8],
) -> Result<Delivery<'a>, ListenerError> {
    if method != Method::POST {
        return Err(ListenerError::MethodNotAllowed);
    }

    let signature = required_header(headers, SIGNATURE_HEADER)?;
    let event = required_header(headers, EVENT_HEADER)?;
    let id = required_header(headers, DELIVERY_HEADER)?;

    verifier.verify(signature, body)?;

    Ok(Delivery { event, id })
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

fn required_header<'a>(
    headers: &'a HeaderMap,
    name: &'static str,
) -> Result<&'a str, ListenerError> {
    header_value(headers, name).ok_or(ListenerError::MissingHeader { header: name })
}

fn outcome_response(event: &str, outcome: Outcome) -> Response {
    match outcome {
        Outcome::Handled(ActionResult {
            location: Some(location),
            body,
        }) => {
            info!("HTTP 201: Created {location} for {event} event");
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(body),
            )
                .into_response()
        }
        Outcome::Handled(ActionResult {
            location: None,
            body,
        }) => {
            info!("HTTP 200: {event} event");
            (StatusCode::OK, Json(body)).into_response()
        }
        Outcome::Ignored(reason) => {
            info!("HTTP 200: {reason}");
            (StatusCode::OK, reason).into_response()
        }
    }
}

fn error_response(error: &ListenerError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, error.to_string()).into_response()
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
