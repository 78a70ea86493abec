//! Page flows
//!
//! Resolve a control, act on it, then wait for the outcome. Built on the
//! outcome poller and the resilient locator resolver:
//! - `PageDriver` capability implemented by the browser binding
//! - composite helpers (`ensure_visible`, `ensure_enabled`, `expect_outcome`,
//!   `act_and_await`) raising classified `FlowError`s
//! - login, payment, contacts and feed flows for the application under test

pub mod contacts;
pub mod driver;
pub mod errors;
pub mod feed;
pub mod login;
pub mod outcome;
pub mod payment;
pub mod selectors;
pub mod session;
pub mod timeouts;

pub use contacts::ContactsFlow;
pub use driver::{DriverError, PageDriver};
pub use errors::{FailureCategory, FlowError};
pub use feed::{FeedFlow, FeedState, FeedTab};
pub use login::{login_outcome_probes, Credentials, LoginFlow};
pub use outcome::{
    act_and_await, await_outcome, count_probe, enabled_probe, ensure_disabled, ensure_enabled,
    ensure_hidden, ensure_visible, expect_outcome, state_probe, text_probe, url_probe, visible_probe,
    ActionStep, ControlState, UrlCheck,
};
pub use payment::{transfer_outcome_probes, PaymentFlow, Transfer, TransferKind};
pub use session::Session;
pub use timeouts::FlowTimeouts;
