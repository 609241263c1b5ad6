//! Typed request parameters for the PayWhirl API.
//!
//! The remote API accepts flat JSON objects. Each endpoint that takes
//! parameters has a struct here: required fields are plain, optional
//! fields are `Option` and left off the wire when `None`. Endpoints whose
//! full field set is documented only at api.paywhirl.com additionally
//! carry an `extra` map that flattens into the payload, so parameters not
//! enumerated here remain expressible.

use serde::Serialize;
use serde_json::{Map, Value};

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Sort order for the subscriber list, which also supports a random order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberOrder {
    Asc,
    Desc,
    Rand,
}

/// Filters for `get_customers`.
///
/// `limit` defaults to 100 server-side and `order_key` to `id`.
/// `before_id`/`after_id` bound the returned ids; `keyword` filters by
/// the given string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCustomers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<OrderDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Filters for `get_plans`. Same shape as [`ListCustomers`] minus the
/// keyword filter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListPlans {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<OrderDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<i64>,
}

/// Filters for `get_subscribers`. `limit` defaults to 20 server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListSubscribers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SubscriberOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_before: Option<i64>,
}

/// Payload for `create_customer`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Three-letter currency code, e.g. "USD".
    pub currency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewCustomer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            currency: currency.into(),
            extra: Map::new(),
        }
    }
}

/// Payload for `update_customer`. Any field of an existing customer
/// object is a valid entry in `fields`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCustomer {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Payload for `update_answer`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateAnswer {
    pub customer_id: i64,
    pub question_name: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_id: Option<i64>,
}

/// Payload for `create_plan`. Billing rules beyond the name are
/// documented at api.paywhirl.com and go through `extra`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPlan {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for `update_plan`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePlan {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Payload for `subscribe_customer`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSubscription {
    pub customer_id: i64,
    pub plan_id: i64,
    /// Number of subscriptions, defaults to 1 server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_id: Option<i64>,
    /// UNIX timestamp for the end of a trial period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_end: Option<i64>,
}

impl NewSubscription {
    pub fn new(customer_id: i64, plan_id: i64) -> Self {
        Self {
            customer_id,
            plan_id,
            quantity: None,
            promo_id: None,
            trial_end: None,
        }
    }
}

/// Payload for `update_subscription`, moving a subscription to a new plan.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateSubscription {
    pub subscription_id: i64,
    pub plan_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments_left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<i64>,
}

impl UpdateSubscription {
    pub fn new(subscription_id: i64, plan_id: i64) -> Self {
        Self {
            subscription_id,
            plan_id,
            quantity: None,
            address_id: None,
            installments_left: None,
            trial_end: None,
            card_id: None,
        }
    }
}

/// Extra processing parameters for `process_invoice`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessInvoice {
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// Payload for `create_invoice`. The invoice date, currency, and line
/// items are documented at api.paywhirl.com and go through `extra`.
#[derive(Debug, Clone, Serialize)]
pub struct NewInvoice {
    pub customer_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for `create_charge`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCharge {
    pub customer_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for `refund_charge`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefundCharge {
    /// Amount to refund, as a decimal string. Full refund when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<String>,
    /// Mark the charge refunded without moving money.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_only: Option<bool>,
}

/// Payload for `create_card`, attaching a payment method to a customer.
#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    pub customer_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for `create_promo`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPromo {
    pub code: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for `send_email`. The parameter set depends on which email
/// template the account has configured.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendEmail {
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// Payload for `get_multi_auth_token`, which logs a customer into a
/// widget automatically.
#[derive(Debug, Clone, Serialize)]
pub struct MultiAuth {
    pub customer_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
