//! High-level client for the PayWhirl API.
//!
//! A [`PayWhirl`] instance holds the account credentials and base URL and
//! exposes one method per documented API action. Every method delegates to
//! a single request primitive that attaches the credentials, sends the
//! call over a fresh transport, and maps the response to decoded JSON or
//! a typed error.

use crate::error::{PaywhirlError, Result};
use crate::http::{HttpClient, HttpClientBuilder, HttpMethod};
use crate::types::{
    ListCustomers, ListPlans, ListSubscribers, MultiAuth, NewCard, NewCharge, NewCustomer,
    NewInvoice, NewPlan, NewPromo, NewSubscription, ProcessInvoice, RefundCharge, SendEmail,
    UpdateAnswer, UpdateCustomer, UpdatePlan, UpdateSubscription,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Default target URL for API requests.
pub const DEFAULT_API_BASE: &str = "https://api.paywhirl.com";

/// Client for the PayWhirl API.
///
/// Holds the API key, API secret, and base URL. All fields are fixed at
/// construction time; the builder-style setters consume `self`, so a
/// finished client can be shared freely across threads.
///
/// # Example
/// ```no_run
/// use paywhirl::PayWhirl;
///
/// # fn main() -> paywhirl::Result<()> {
/// let pw = PayWhirl::new("pwpk_xxxxxxxxxxxxxxx", "pwpsk_xxxxxxxxxxx")?;
/// let account = pw.get_account()?;
/// println!("{account}");
/// # Ok(())
/// # }
/// ```
pub struct PayWhirl {
    api_key: String,
    api_secret: String,
    api_base: String,
    verify_ssl: bool,
    verbose: bool,
    timeout: Option<u64>,
    user_agent: Option<String>,
}

impl PayWhirl {
    /// Create a new client with the given credentials.
    ///
    /// Only checks that neither credential is empty; whether they are
    /// actually valid is decided by the server on the first call. No
    /// network traffic happens here.
    ///
    /// # Errors
    /// Returns `MissingApiKey` or `MissingApiSecret` when the respective
    /// argument is empty or whitespace.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.trim().is_empty() {
            return Err(PaywhirlError::MissingApiKey);
        }
        if api_secret.trim().is_empty() {
            return Err(PaywhirlError::MissingApiSecret);
        }

        Ok(Self {
            api_key,
            api_secret,
            api_base: DEFAULT_API_BASE.to_string(),
            verify_ssl: true,
            verbose: false,
            timeout: None,
            user_agent: None,
        })
    }

    /// Override the base URL requests are sent to.
    #[must_use]
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Set the request timeout in seconds. The transport's default
    /// applies when unset.
    #[must_use]
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Set a custom User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Toggle TLS certificate verification. On by default.
    #[must_use]
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Enable verbose transport output for debugging.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    // ==================== Customers ====================

    /// List customers on the account, filtered by `params`.
    pub fn get_customers(&self, params: &ListCustomers) -> Result<Value> {
        self.get("/customers", Some(serde_json::to_value(params)?))
    }

    /// Fetch a single customer by id.
    pub fn get_customer(&self, customer_id: i64) -> Result<Value> {
        self.get(&format!("/customer/{customer_id}"), None)
    }

    /// List all addresses attached to a customer.
    pub fn get_addresses(&self, customer_id: i64) -> Result<Value> {
        self.get(&format!("/customer/addresses/{customer_id}"), None)
    }

    /// Fetch a single address by id.
    pub fn get_address(&self, address_id: i64) -> Result<Value> {
        self.get(&format!("/customer/address/{address_id}"), None)
    }

    /// Fetch a customer's full profile: the customer, their addresses,
    /// and their profile question answers.
    pub fn get_profile(&self, customer_id: i64) -> Result<Value> {
        self.get(&format!("/customer/profile/{customer_id}"), None)
    }

    /// Authenticate a customer. The password may be plain text or a
    /// bcrypt hash.
    pub fn auth_customer(&self, email: &str, password: &str) -> Result<Value> {
        let data = json!({ "email": email, "password": password });
        self.post("/auth/customer", Some(data))
    }

    /// Create a new customer.
    pub fn create_customer(&self, customer: &NewCustomer) -> Result<Value> {
        self.post("/create/customer", Some(serde_json::to_value(customer)?))
    }

    /// Update an existing customer, selected by its `id` field.
    pub fn update_customer(&self, update: &UpdateCustomer) -> Result<Value> {
        self.post("/update/customer", Some(serde_json::to_value(update)?))
    }

    /// Soft-delete a customer. Pass `forget = Some(true)` to also
    /// obfuscate the stored customer data.
    pub fn delete_customer(&self, customer_id: i64, forget: Option<bool>) -> Result<Value> {
        let mut data = Map::new();
        data.insert("id".to_string(), json!(customer_id));
        if let Some(forget) = forget {
            // the API expects an integer flag
            data.insert("forget".to_string(), json!(if forget { 1 } else { 0 }));
        }
        self.post("/delete/customer", Some(Value::Object(data)))
    }

    // ==================== Questions and answers ====================

    /// List profile questions on the account, at most `limit` of them.
    pub fn get_questions(&self, limit: u64) -> Result<Value> {
        self.get("/questions", Some(json!({ "limit": limit })))
    }

    /// Create or update a customer's answer to a profile question.
    pub fn update_answer(&self, answer: &UpdateAnswer) -> Result<Value> {
        self.post("/update/answer", Some(serde_json::to_value(answer)?))
    }

    /// List a customer's profile question answers.
    pub fn get_answers(&self, customer_id: i64) -> Result<Value> {
        self.get("/answers", Some(json!({ "customer_id": customer_id })))
    }

    // ==================== Plans ====================

    /// List billing plans on the account, filtered by `params`.
    pub fn get_plans(&self, params: &ListPlans) -> Result<Value> {
        self.get("/plans", Some(serde_json::to_value(params)?))
    }

    /// Fetch a single plan by id.
    pub fn get_plan(&self, plan_id: i64) -> Result<Value> {
        self.get(&format!("/plan/{plan_id}"), None)
    }

    /// Create a billing plan.
    pub fn create_plan(&self, plan: &NewPlan) -> Result<Value> {
        self.post("/create/plan", Some(serde_json::to_value(plan)?))
    }

    /// Update an existing plan, selected by its `id` field.
    pub fn update_plan(&self, update: &UpdatePlan) -> Result<Value> {
        self.post("/update/plan", Some(serde_json::to_value(update)?))
    }

    // ==================== Subscriptions ====================

    /// List all subscriptions for a customer.
    pub fn get_subscriptions(&self, customer_id: i64) -> Result<Value> {
        self.get(&format!("/subscriptions/{customer_id}"), None)
    }

    /// Fetch a single subscription by id.
    pub fn get_subscription(&self, subscription_id: i64) -> Result<Value> {
        self.get(&format!("/subscription/{subscription_id}"), None)
    }

    /// Subscribe a customer to a plan.
    pub fn subscribe_customer(&self, subscription: &NewSubscription) -> Result<Value> {
        self.post(
            "/subscribe/customer",
            Some(serde_json::to_value(subscription)?),
        )
    }

    /// Move an existing subscription to a different plan.
    pub fn update_subscription(&self, update: &UpdateSubscription) -> Result<Value> {
        self.post(
            "/update/subscription",
            Some(serde_json::to_value(update)?),
        )
    }

    /// Cancel a customer's subscription.
    pub fn unsubscribe_customer(&self, subscription_id: i64) -> Result<Value> {
        let data = json!({ "subscription_id": subscription_id });
        self.post("/unsubscribe/customer", Some(data))
    }

    /// List all active subscribers, filtered by `params`.
    pub fn get_subscribers(&self, params: &ListSubscribers) -> Result<Value> {
        self.get("/subscribers", Some(serde_json::to_value(params)?))
    }

    // ==================== Invoices ====================

    /// Fetch a single invoice by id.
    pub fn get_invoice(&self, invoice_id: i64) -> Result<Value> {
        self.get(&format!("/invoice/{invoice_id}"), None)
    }

    /// List a customer's upcoming invoices, or all of their invoices
    /// when `all_invoices` is set.
    pub fn get_invoices(&self, customer_id: i64, all_invoices: bool) -> Result<Value> {
        let params = json!({ "all": if all_invoices { "1" } else { "" } });
        self.get(&format!("/invoices/{customer_id}"), Some(params))
    }

    /// Process an upcoming invoice now.
    pub fn process_invoice(&self, invoice_id: i64, params: &ProcessInvoice) -> Result<Value> {
        self.post(
            &format!("/invoice/{invoice_id}/process"),
            Some(serde_json::to_value(params)?),
        )
    }

    /// Mark an upcoming invoice as paid.
    pub fn mark_invoice_as_paid(&self, invoice_id: i64) -> Result<Value> {
        self.post(&format!("/invoice/{invoice_id}/mark-as-paid"), None)
    }

    /// Apply a promo code to an upcoming invoice.
    pub fn add_promo_code_to_invoice(&self, invoice_id: i64, promo_code: &str) -> Result<Value> {
        let data = json!({ "promo_code": promo_code });
        self.post(&format!("/invoice/{invoice_id}/add-promo"), Some(data))
    }

    /// Remove the promo code from an upcoming invoice.
    pub fn remove_promo_code_from_invoice(&self, invoice_id: i64) -> Result<Value> {
        self.post(&format!("/invoice/{invoice_id}/remove-promo"), None)
    }

    /// Change the card an invoice will be charged against.
    pub fn update_invoice_card(&self, invoice_id: i64, card_id: i64) -> Result<Value> {
        let data = json!({ "card_id": card_id });
        self.post(&format!("/invoice/{invoice_id}/card"), Some(data))
    }

    /// Update line item quantities on an invoice. Keys are item ids,
    /// values the new quantities.
    pub fn update_invoice_items(
        &self,
        invoice_id: i64,
        line_items: &HashMap<String, u32>,
    ) -> Result<Value> {
        self.post(
            &format!("/invoice/{invoice_id}/items"),
            Some(serde_json::to_value(line_items)?),
        )
    }

    /// Create a new invoice.
    pub fn create_invoice(&self, invoice: &NewInvoice) -> Result<Value> {
        self.post("/invoices", Some(serde_json::to_value(invoice)?))
    }

    /// Delete an existing invoice by id.
    pub fn delete_invoice(&self, invoice_id: i64) -> Result<Value> {
        self.post("/delete/invoice", Some(json!({ "id": invoice_id })))
    }

    // ==================== Gateways ====================

    /// List the payment gateways configured on the account.
    pub fn get_gateways(&self) -> Result<Value> {
        self.get("/gateways", None)
    }

    /// Fetch a single gateway by id.
    pub fn get_gateway(&self, gateway_id: i64) -> Result<Value> {
        self.get(&format!("/gateway/{gateway_id}"), None)
    }

    // ==================== Charges ====================

    /// Charge a customer immediately and return the resulting invoice.
    pub fn create_charge(&self, charge: &NewCharge) -> Result<Value> {
        self.post("/create/charge", Some(serde_json::to_value(charge)?))
    }

    /// Fetch a single charge by id.
    pub fn get_charge(&self, charge_id: i64) -> Result<Value> {
        self.get(&format!("/charge/{charge_id}"), None)
    }

    /// Refund a charge, fully or partially.
    pub fn refund_charge(&self, charge_id: i64, params: &RefundCharge) -> Result<Value> {
        self.post(
            &format!("/refund/charge/{charge_id}"),
            Some(serde_json::to_value(params)?),
        )
    }

    // ==================== Cards ====================

    /// List the cards attached to a customer.
    pub fn get_cards(&self, customer_id: i64) -> Result<Value> {
        self.get(&format!("/cards/{customer_id}"), None)
    }

    /// Fetch a single card by id.
    pub fn get_card(&self, card_id: i64) -> Result<Value> {
        self.get(&format!("/card/{card_id}"), None)
    }

    /// Attach a new payment method to an existing customer.
    pub fn create_card(&self, card: &NewCard) -> Result<Value> {
        self.post("/create/card", Some(serde_json::to_value(card)?))
    }

    /// Delete an existing card by id.
    pub fn delete_card(&self, card_id: i64) -> Result<Value> {
        self.post("/delete/card", Some(json!({ "id": card_id })))
    }

    // ==================== Promos ====================

    /// List all promo codes on file.
    pub fn get_promos(&self) -> Result<Value> {
        self.get("/promo", None)
    }

    /// Fetch a single promo code by id.
    pub fn get_promo(&self, promo_id: i64) -> Result<Value> {
        self.get(&format!("/promo/{promo_id}"), None)
    }

    /// Create a promo code for use with subscriptions.
    pub fn create_promo(&self, promo: &NewPromo) -> Result<Value> {
        self.post("/create/promo", Some(serde_json::to_value(promo)?))
    }

    /// Delete an existing promo code by id.
    pub fn delete_promo(&self, promo_id: i64) -> Result<Value> {
        self.post("/delete/promo", Some(json!({ "id": promo_id })))
    }

    // ==================== Email, account, misc ====================

    /// Fetch an email template by id.
    pub fn get_email_template(&self, template_id: i64) -> Result<Value> {
        self.get(&format!("/email/{template_id}"), None)
    }

    /// Send a system-generated email based on one of the account's
    /// templates.
    pub fn send_email(&self, email: &SendEmail) -> Result<Value> {
        self.post("/send-email", Some(serde_json::to_value(email)?))
    }

    /// Fetch the account information.
    pub fn get_account(&self) -> Result<Value> {
        self.get("/account", None)
    }

    /// Fetch invoice and revenue statistics for the account.
    pub fn get_stats(&self) -> Result<Value> {
        self.get("/stats", None)
    }

    /// List the account's shipping rules.
    pub fn get_shipping_rules(&self) -> Result<Value> {
        self.get("/shipping/", None)
    }

    /// Fetch a single shipping rule by id.
    pub fn get_shipping_rule(&self, shipping_rule_id: i64) -> Result<Value> {
        self.get(&format!("/shipping/{shipping_rule_id}"), None)
    }

    /// List the account's tax rules.
    pub fn get_tax_rules(&self) -> Result<Value> {
        self.get("/tax", None)
    }

    /// Fetch a single tax rule by id.
    pub fn get_tax_rule(&self, rule_id: i64) -> Result<Value> {
        self.get(&format!("/tax/{rule_id}"), None)
    }

    /// Get a MultiAuth token for logging a customer into a widget
    /// automatically.
    pub fn get_multi_auth_token(&self, params: &MultiAuth) -> Result<Value> {
        self.post("/multiauth", Some(serde_json::to_value(params)?))
    }

    // ==================== Request primitive ====================

    fn get(&self, path: &str, params: Option<Value>) -> Result<Value> {
        self.request(HttpMethod::Get, path, params)
    }

    fn post(&self, path: &str, params: Option<Value>) -> Result<Value> {
        self.request(HttpMethod::Post, path, params)
    }

    /// Build a fresh transport carrying the credential headers.
    fn transport(&self, with_json_body: bool) -> Result<HttpClient> {
        let mut builder = HttpClientBuilder::new()
            .verbose(self.verbose)
            .verify_ssl(self.verify_ssl)
            .header("api_key", self.api_key.as_str())
            .header("api_secret", self.api_secret.as_str());

        if with_json_body {
            builder = builder.header("Content-Type", "application/json");
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(ref ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }

        builder.build()
    }

    /// Send one authenticated request and map the response.
    ///
    /// Parameters go into the query string for GET and into a JSON body
    /// for every other method. A non-2xx status becomes
    /// `PaywhirlError::Http`; a 2xx body that is not valid JSON becomes
    /// `PaywhirlError::Decode`.
    fn request(&self, method: HttpMethod, path: &str, params: Option<Value>) -> Result<Value> {
        let mut client = self.transport(method.has_body())?;
        let mut url = format!("{}{}", self.api_base, path);

        let body;
        let payload = if method.has_body() {
            // the original client always sends a JSON body, {} when empty
            body = params
                .unwrap_or_else(|| Value::Object(Map::new()))
                .to_string()
                .into_bytes();
            Some(body.as_slice())
        } else {
            if let Some(ref params) = params {
                let query = query_string(&mut client, params);
                if !query.is_empty() {
                    url.push('?');
                    url.push_str(&query);
                }
            }
            None
        };

        let response = client.request(method, &url, payload)?;

        if !response.is_success() {
            return Err(PaywhirlError::Http {
                status: response.status_code,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        serde_json::from_slice(&response.body).map_err(|source| PaywhirlError::Decode {
            source,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }
}

/// Render a JSON object as a percent-encoded query string.
fn query_string(client: &mut HttpClient, params: &Value) -> String {
    let mut pairs = Vec::new();

    if let Value::Object(map) = params {
        for (key, value) in map {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            pairs.push(format!(
                "{}={}",
                client.url_encode(key),
                client.url_encode(&text)
            ));
        }
    }

    pairs.join("&")
}
