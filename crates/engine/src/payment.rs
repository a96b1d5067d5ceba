//! Payment strategies and the external checkout seam.
//!
//! Offline registrations never touch the checkout. Online registrations
//! either hand the user a checkout URL and finish when they come back with
//! the return URL ([`PaymentStrategy::Redirect`]), or collect the payment in
//! place through a [`CheckoutWidget`] ([`PaymentStrategy::Embedded`]).

use std::fmt;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regdesk_types::{PaymentMode, RegistrationDraft};
use regdesk_util::{CheckoutSettings, OnlinePaymentStrategy};
use thiserror::Error;
use url::Url;

/// Query parameter carrying the success marker on the return URL.
pub const PAYMENT_MARKER_PARAM: &str = "payment";
pub const PAYMENT_SUCCESS_MARKER: &str = "success";
/// Query parameter the checkout appends with the payment identifier.
pub const PAYMENT_ID_PARAM: &str = "razorpay_payment_id";
const RETURN_URL_FRAGMENT_KEY: &str = "return_url";

/// Characters left unescaped by a URI component encoder.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStrategy {
    Offline,
    Redirect,
    Embedded,
}

impl PaymentStrategy {
    pub fn for_mode(mode: PaymentMode, online: OnlinePaymentStrategy) -> Self {
        match (mode, online) {
            (PaymentMode::Offline, _) => PaymentStrategy::Offline,
            (PaymentMode::Online, OnlinePaymentStrategy::Redirect) => PaymentStrategy::Redirect,
            (PaymentMode::Online, OnlinePaymentStrategy::Embedded) => PaymentStrategy::Embedded,
        }
    }
}

/// Identifier issued by the checkout for a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact details prefilled into the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Everything the checkout widget is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub public_key: String,
    pub amount_minor: u64,
    pub currency: String,
    pub display_name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: CheckoutPrefill,
}

impl CheckoutRequest {
    pub fn new(settings: &CheckoutSettings, order_id: impl Into<String>, draft: &RegistrationDraft) -> Self {
        Self {
            public_key: settings.public_key.clone(),
            amount_minor: settings.amount_minor,
            currency: settings.currency.clone(),
            display_name: settings.display_name.clone(),
            description: settings.description.clone(),
            order_id: order_id.into(),
            prefill: CheckoutPrefill {
                name: draft.name.clone(),
                email: draft.email.clone(),
                phone: draft.phone.clone(),
            },
        }
    }

    /// Amount formatted in major units, e.g. `200.00 INR`.
    pub fn display_amount(&self) -> String {
        format!("{}.{:02} {}", self.amount_minor / 100, self.amount_minor % 100, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("payment was cancelled")]
    Cancelled,
    #[error("payment failed: {0}")]
    Failed(String),
}

/// An embedded checkout that resolves once the user pays or gives up.
#[async_trait]
pub trait CheckoutWidget: Send + Sync {
    async fn collect(&self, request: CheckoutRequest) -> Result<PaymentId, CheckoutError>;
}

/// Build the external checkout URL carrying an encoded return URL.
///
/// The return URL gains `payment=success` so the client can recognise a
/// completed checkout when the user comes back.
pub fn build_checkout_url(checkout_url: &str, return_url: &str) -> Result<Url, url::ParseError> {
    let mut return_target = Url::parse(return_url)?;
    return_target
        .query_pairs_mut()
        .append_pair(PAYMENT_MARKER_PARAM, PAYMENT_SUCCESS_MARKER);

    let mut checkout = Url::parse(checkout_url)?;
    let encoded = utf8_percent_encode(return_target.as_str(), URI_COMPONENT);
    checkout.set_fragment(Some(&format!("?{RETURN_URL_FRAGMENT_KEY}={encoded}")));
    Ok(checkout)
}

/// Parameters found on the URL the checkout returned to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnParams {
    pub payment_marker: Option<String>,
    pub payment_id: Option<PaymentId>,
}

impl ReturnParams {
    /// Parse a full return URL or a bare query string such as `payment=success`.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let trimmed = input.trim();
        let url = match Url::parse(trimmed) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(&format!("http://return.invalid/?{}", trimmed.trim_start_matches('?')))?
            }
            Err(error) => return Err(error),
        };

        let mut params = ReturnParams::default();
        for (key, value) in url.query_pairs() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                PAYMENT_MARKER_PARAM => params.payment_marker = Some(value.to_string()),
                PAYMENT_ID_PARAM => params.payment_id = Some(PaymentId::new(value)),
                _ => {}
            }
        }
        Ok(params)
    }

    /// A success marker or a payment identifier is present.
    pub fn indicates_success(&self) -> bool {
        self.payment_marker.as_deref() == Some(PAYMENT_SUCCESS_MARKER) || self.payment_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_url_encodes_return_target() {
        let url = build_checkout_url("https://rzp.io/rzp/qE5ylHJ", "http://localhost:8000/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://rzp.io/rzp/qE5ylHJ#?return_url=http%3A%2F%2Flocalhost%3A8000%2F%3Fpayment%3Dsuccess"
        );
    }

    #[test]
    fn return_params_from_url_and_bare_query() {
        let params =
            ReturnParams::parse("http://localhost:8000/?payment=success&razorpay_payment_id=pay_29QQoUBi66xm2f").unwrap();
        assert_eq!(params.payment_marker.as_deref(), Some("success"));
        assert_eq!(params.payment_id, Some(PaymentId::new("pay_29QQoUBi66xm2f")));
        assert!(params.indicates_success());

        let bare = ReturnParams::parse("?razorpay_payment_id=pay_1").unwrap();
        assert!(bare.indicates_success());
        assert!(bare.payment_marker.is_none());
    }

    #[test]
    fn return_without_markers_is_not_success() {
        let params = ReturnParams::parse("http://localhost:8000/?payment=&utm_source=mail").unwrap();
        assert_eq!(params, ReturnParams::default());
        assert!(!params.indicates_success());
        assert!(!ReturnParams::parse("payment=failed").unwrap().indicates_success());
    }

    #[test]
    fn checkout_request_prefills_contact_fields() {
        let draft = RegistrationDraft {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            whatsapp: "9876543210".into(),
            college: "City College".into(),
            year: "3".into(),
            department: "CSE".into(),
            events: Default::default(),
            payment_mode: PaymentMode::Online,
            project_link: None,
            payment_status: None,
            payment_id: None,
        };
        let request = CheckoutRequest::new(&CheckoutSettings::default(), "order_1", &draft);
        assert_eq!(request.prefill.email, "asha@example.com");
        assert_eq!(request.order_id, "order_1");
        assert_eq!(request.display_amount(), "200.00 INR");
    }
}
