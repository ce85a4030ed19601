//! Webhook intake for the custody desk and the fiat processor.
//!
//! Handlers verify the provider signature over the raw body, normalize the
//! payload into a [`TransferEvent`], and enqueue it. The acknowledgement is
//! sent as soon as the event is on the lane; application happens
//! asynchronously, since providers retry on slow responses and a retry storm
//! would amplify duplicate deliveries.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use kobo_core::reconcile::{CryptoNotice, TransferEvent, TransferNotice};
use kobo_shared::types::Currency;

use crate::AppState;
use crate::signature::{
    CUSTODY_SIGNATURE_HEADER, PROCESSOR_SIGNATURE_HEADER, verify_sha256, verify_sha512,
};

/// Creates the webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/webhooks/custody", post(custody_webhook))
        .route("/webhooks/transfers", post(processor_webhook))
}

/// Provider envelope shared by both rails.
#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Custody payload fields used at intake.
///
/// Everything else in the delivery is untrusted; the reconciler re-queries
/// the desk before settling anything.
#[derive(Debug, Deserialize)]
struct CustodyPayload {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

/// Fiat processor payload fields used at intake.
#[derive(Debug, Deserialize)]
struct ProcessorPayload {
    reference: String,
    /// Gross amount in minor units (kobo).
    amount: i64,
    status: String,
    currency: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

/// POST /webhooks/custody - Notifications from the crypto custody desk.
async fn custody_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let verified = signature_header(&headers, CUSTODY_SIGNATURE_HEADER).is_some_and(|signature| {
        verify_sha256(state.webhooks.custody_secret.as_bytes(), &body, signature)
    });
    if !verified {
        warn!("custody webhook rejected: signature missing or invalid");
        return unauthorized();
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "custody webhook body is not valid JSON");
            return malformed();
        }
    };

    let make_event = match envelope.event.as_str() {
        "transaction.incoming" => TransferEvent::CryptoIncoming,
        "transaction.deposit.created" => TransferEvent::CryptoDepositCreated,
        other => {
            debug!(event = other, "ignoring unhandled custody event");
            return ignored();
        }
    };

    let payload: CustodyPayload = match serde_json::from_value(envelope.data) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(event = %envelope.event, error = %err, "custody payload missing required fields");
            return malformed();
        }
    };

    let notice = CryptoNotice {
        reference: payload.reference,
        occurred_at: payload.created_at.unwrap_or_else(Utc::now),
    };

    enqueue_and_ack(&state, make_event(notice))
}

/// POST /webhooks/transfers - Transfer outcomes from the fiat processor.
async fn processor_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let verified =
        signature_header(&headers, PROCESSOR_SIGNATURE_HEADER).is_some_and(|signature| {
            verify_sha512(state.webhooks.processor_secret.as_bytes(), &body, signature)
        });
    if !verified {
        warn!("processor webhook rejected: signature missing or invalid");
        return unauthorized();
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "processor webhook body is not valid JSON");
            return malformed();
        }
    };

    let make_event = match envelope.event.as_str() {
        "transfer.success" => TransferEvent::TransferSucceeded,
        "transfer.failed" => TransferEvent::TransferFailed,
        "transfer.reversed" => TransferEvent::TransferReversed,
        other => {
            debug!(event = other, "ignoring unhandled processor event");
            return ignored();
        }
    };

    let payload: ProcessorPayload = match serde_json::from_value(envelope.data) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(event = %envelope.event, error = %err, "processor payload missing required fields");
            return malformed();
        }
    };

    let notice = match normalize_processor(payload) {
        Ok(notice) => notice,
        Err(err) => {
            warn!(event = %envelope.event, error = %err, "processor payload could not be normalized");
            return malformed();
        }
    };

    enqueue_and_ack(&state, make_event(notice))
}

/// Maps a processor payload into the internal event shape.
///
/// Amounts arrive in minor units and are divided down to major units here,
/// before any fee or balance math can see them.
fn normalize_processor(payload: ProcessorPayload) -> Result<TransferNotice, String> {
    let currency = match payload.currency.as_deref() {
        Some(code) => code.parse::<Currency>()?,
        None => Currency::Ngn,
    };

    Ok(TransferNotice {
        amount: currency.from_minor_units(payload.amount),
        reference: payload.reference,
        currency,
        raw_status: payload.status,
        occurred_at: payload.created_at.unwrap_or_else(Utc::now),
    })
}

fn signature_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn enqueue_and_ack(state: &AppState, event: TransferEvent) -> Response {
    info!(
        kind = event.kind(),
        reference = event.reference(),
        "webhook event accepted"
    );

    match state.queue.enqueue(event) {
        Ok(()) => ack(),
        Err(err) => {
            error!(error = %err, "event lane rejected a webhook event");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "service_unavailable",
                    "message": "Event intake is shut down"
                })),
            )
                .into_response()
        }
    }
}

fn ack() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

fn ignored() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ignored" }))).into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_signature",
            "message": "Webhook signature is missing or does not match"
        })),
    )
        .into_response()
}

fn malformed() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "malformed_event",
            "message": "Payload is missing required fields"
        })),
    )
        .into_response()
}
