//! Regdesk registration backend client.
//!
//! This crate wraps a configured `reqwest::Client` and exposes one method per
//! backend call:
//!
//! - `register` posts the draft and returns the issued ticket
//! - `create_order` / `confirm_payment` drive the embedded checkout
//! - `participant` / `registration_status` read back registration state
//! - `notify_webhook` is best-effort and never fails the caller
//!
//! Responses are judged by HTTP status and the `status` field of the JSON
//! body; see [`ApiError`] for how failures are classified. No request timeout
//! is configured: a hung call keeps its trigger disabled until it resolves.
//!
//! The [`RegistrationBackend`] trait is the seam used by the engine so flows
//! can be exercised against fakes.

mod backend;
mod error;

pub use backend::RegistrationBackend;
pub use error::{ApiError, GENERIC_FAILURE_MESSAGE, NETWORK_FAILURE_MESSAGE};

use std::env;

use regdesk_types::{
    ApiEnvelope, ConfirmPaymentRequest, CreateOrderRequest, CreateOrderResponse, Participant, ParticipantResponse,
    RegisterResponse, RegistrationDraft, RegistrationStatusResponse, WebhookNotification,
};
use regdesk_util::redact_payment_id;
use reqwest::{Client, Method, RequestBuilder, Url, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Hostnames allowed to use plain HTTP.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

const REGISTER_PATH: &str = "register";
const CREATE_ORDER_PATH: &str = "create-order";
const CONFIRM_PAYMENT_PATH: &str = "confirm-payment";
const PARTICIPANT_PATH: &str = "participant";
const REGISTRATION_PATH: &str = "registration";
const WEBHOOK_PATH: &str = "webhook";

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for the registration backend.
pub struct RegdeskClient {
    base_url: Url,
    http: Client,
    user_agent: String,
}

impl RegdeskClient {
    /// Construct a client for `base_url`.
    ///
    /// Non-localhost hosts must use HTTPS.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = validate_base_url(base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("regdesk/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a request for a method and endpoint path segments.
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%url, %method, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Resolve path segments (percent-encoded) beneath the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn register(&self, draft: &RegistrationDraft) -> Result<RegisterResponse, ApiError> {
        debug!(
            events = draft.events.len(),
            payment_mode = %draft.payment_mode,
            payment_status = ?draft.payment_status,
            "submitting registration"
        );
        let builder = self.request(Method::POST, &[REGISTER_PATH]).json(draft);
        send_json(builder, "register", true).await
    }

    pub async fn create_order(&self, amount_minor: u64) -> Result<CreateOrderResponse, ApiError> {
        let builder = self
            .request(Method::POST, &[CREATE_ORDER_PATH])
            .json(&CreateOrderRequest { amount: amount_minor });
        send_json(builder, "create-order", true).await
    }

    pub async fn confirm_payment(&self, request: &ConfirmPaymentRequest) -> Result<(), ApiError> {
        debug!(
            ticket_id = %request.ticket_id,
            payment_id = %redact_payment_id(&request.payment_id),
            "confirming payment"
        );
        let builder = self.request(Method::POST, &[CONFIRM_PAYMENT_PATH]).json(request);
        send_json::<serde_json::Value>(builder, "confirm-payment", true).await.map(|_| ())
    }

    pub async fn participant(&self, ticket_id: &str) -> Result<Participant, ApiError> {
        let builder = self.request(Method::GET, &[PARTICIPANT_PATH, ticket_id]);
        let response: ParticipantResponse = send_json(builder, "participant", true).await?;
        Ok(response.participant)
    }

    /// The registration status shape carries no `status` marker; only HTTP status is checked.
    pub async fn registration_status(&self, registration_id: &str) -> Result<RegistrationStatusResponse, ApiError> {
        let builder = self.request(Method::GET, &[REGISTRATION_PATH, registration_id]);
        send_json(builder, "registration", false).await
    }

    /// Fire-and-forget notification; failures are logged and swallowed.
    pub async fn notify_webhook(&self, notification: &WebhookNotification) {
        let result = self
            .request(Method::POST, &[WEBHOOK_PATH])
            .json(notification)
            .send()
            .await;
        match result {
            Ok(response) => debug!(status = %response.status(), event = %notification.event, "webhook notified"),
            Err(error) => warn!(error = %error, event = %notification.event, "webhook notification failed"),
        }
    }
}

/// Send a request and decode a JSON success body.
///
/// When `expect_success_marker` is set, a body whose `status` is not
/// `"success"` is a business failure even on HTTP 2xx.
async fn send_json<T: DeserializeOwned>(
    builder: RequestBuilder,
    call: &'static str,
    expect_success_marker: bool,
) -> Result<T, ApiError> {
    let response = builder.send().await.map_err(|source| {
        warn!(call, error = %source, "http request failed");
        ApiError::Transport { call, source }
    })?;
    let status = response.status();
    let text = response.text().await.map_err(|source| ApiError::Transport { call, source })?;
    let envelope = serde_json::from_str::<ApiEnvelope>(&text).unwrap_or_default();

    if !status.is_success() {
        warn!(call, status = %status, "backend returned an error status");
        return Err(ApiError::Business {
            call,
            http_status: Some(status.as_u16()),
            detail: envelope.detail_text(),
        });
    }
    if expect_success_marker && !envelope.is_success() {
        warn!(call, status = ?envelope.status, "backend reported a business failure");
        return Err(ApiError::Business {
            call,
            http_status: Some(status.as_u16()),
            detail: envelope.detail_text(),
        });
    }

    serde_json::from_str::<T>(&text).map_err(|error| ApiError::Decode {
        call,
        message: error.to_string(),
    })
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let parsed = Url::parse(base.trim()).map_err(|error| invalid(error.to_string()))?;
    let host_name = parsed
        .host_str()
        .ok_or_else(|| invalid("URL must include a host".into()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(parsed);
    }

    if parsed.scheme() != "https" {
        return Err(invalid(format!(
            "non-localhost hosts must use https; got '{}://'",
            parsed.scheme()
        )));
    }
    Ok(parsed)
}
