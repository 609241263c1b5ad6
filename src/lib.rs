//! paywhirl - Rust client for the PayWhirl API
//!
//! This library wraps the PayWhirl API at [api.paywhirl.com](https://api.paywhirl.com)
//! as method calls on a [`PayWhirl`] client. API keys can be obtained from
//! [PayWhirl's account page](https://app.paywhirl.com/api-keys).
//!
//! Every call blocks until the server responds and returns the decoded
//! JSON payload as a [`serde_json::Value`], or a [`PaywhirlError`] carrying
//! the HTTP status and raw body for non-2xx responses.
//!
//! # Example
//! ```no_run
//! use paywhirl::{PayWhirl, PaywhirlError};
//!
//! let pw = PayWhirl::new("pwpk_xxxxxxxxxxxxxxx", "pwpsk_xxxxxxxxxxx")
//!     .expect("credentials must not be empty");
//!
//! match pw.get_account() {
//!     Ok(account) => println!("{account}"),
//!     Err(PaywhirlError::Http { status, body }) => eprintln!("{status}: {body}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{PayWhirl, DEFAULT_API_BASE};
pub use error::{PaywhirlError, Result};
pub use http::{HttpClient, HttpClientBuilder, HttpMethod, HttpResponse};
pub use types::{
    ListCustomers, ListPlans, ListSubscribers, MultiAuth, NewCard, NewCharge, NewCustomer,
    NewInvoice, NewPlan, NewPromo, NewSubscription, OrderDirection, ProcessInvoice, RefundCharge,
    SendEmail, SubscriberOrder, UpdateAnswer, UpdateCustomer, UpdatePlan, UpdateSubscription,
};
