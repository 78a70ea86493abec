//! Page flows against a scripted page on a paused clock

use action_flow::{
    Credentials, DriverError, FailureCategory, FeedState, FeedTab, FlowError, FlowTimeouts, PageDriver,
    Session, Transfer,
};
use action_locator::{ElementCounter, LocatorError, SelectionStrategy as S};
use async_trait::async_trait;
use probegate_core_types::{PollConfig, PollResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const BASE: &str = "http://localhost:3000";

#[derive(Clone)]
enum Reaction {
    Show(S, Duration),
    Hide(S),
    Navigate(String),
    /// Shown, enabled once every listed field is filled
    ShowRequiring(S, Vec<S>, Duration),
    /// Element count changes after the delay
    Count(S, usize, Duration),
}

#[derive(Clone)]
struct Element {
    appears_at: Instant,
    /// Fields that must hold a value before the element enables
    requires: Vec<S>,
}

impl Element {
    fn after(delay: Duration) -> Self {
        Self {
            appears_at: Instant::now() + delay,
            requires: Vec::new(),
        }
    }
}

/// Helper text shown while the field's value is invalid
type Validator = (S, fn(&str) -> bool);

#[derive(Default)]
struct State {
    elements: HashMap<S, Element>,
    validators: HashMap<S, Validator>,
    counts: HashMap<S, Vec<(Instant, usize)>>,
    values: HashMap<S, String>,
    reactions: HashMap<S, Vec<Reaction>>,
    url: String,
    clicks: Vec<S>,
    fills: Vec<(S, String)>,
    visited: Vec<String>,
}

/// Page whose elements and reactions are scripted up front
struct FakePage {
    state: Mutex<State>,
}

impl FakePage {
    fn at(path: &str) -> Self {
        Self {
            state: Mutex::new(State {
                url: format!("{BASE}{path}"),
                ..State::default()
            }),
        }
    }

    fn show(&self, strategy: S) -> &Self {
        self.show_after(strategy, Duration::ZERO)
    }

    fn show_after(&self, strategy: S, delay: Duration) -> &Self {
        self.state.lock().unwrap().elements.insert(strategy, Element::after(delay));
        self
    }

    /// Visible, but disabled until every field in `requires` is filled
    fn show_requiring(&self, strategy: S, requires: Vec<S>) -> &Self {
        let element = Element {
            requires,
            ..Element::after(Duration::ZERO)
        };
        self.state.lock().unwrap().elements.insert(strategy, element);
        self
    }

    fn validate(&self, helper: S, field: S, invalid: fn(&str) -> bool) -> &Self {
        self.state.lock().unwrap().validators.insert(helper, (field, invalid));
        self
    }

    fn set_count(&self, strategy: S, count: usize) -> &Self {
        self.state
            .lock()
            .unwrap()
            .counts
            .insert(strategy, vec![(Instant::now(), count)]);
        self
    }

    fn on_click(&self, strategy: S, reactions: Vec<Reaction>) -> &Self {
        self.state.lock().unwrap().reactions.insert(strategy, reactions);
        self
    }

    fn clicks(&self) -> Vec<S> {
        self.state.lock().unwrap().clicks.clone()
    }

    fn url(&self) -> String {
        self.state.lock().unwrap().url.clone()
    }

    fn fills(&self) -> Vec<(S, String)> {
        self.state.lock().unwrap().fills.clone()
    }

    fn element(&self, strategy: &S) -> Option<Element> {
        let state = self.state.lock().unwrap();
        if let Some((field, invalid)) = state.validators.get(strategy) {
            let value = state.values.get(field).map(String::as_str).unwrap_or("");
            return invalid(value).then(|| Element::after(Duration::ZERO));
        }
        state
            .elements
            .get(strategy)
            .cloned()
            .filter(|element| element.appears_at <= Instant::now())
    }

    fn filled(&self, field: &S) -> bool {
        let state = self.state.lock().unwrap();
        state.values.get(field).is_some_and(|value| !value.is_empty())
    }

    fn login_form(&self) -> &Self {
        self.show(S::css("input#username"))
            .show(S::css("input#password"))
            .show(S::test_id("signin-submit"))
            .show(S::role("heading", "sign in"))
    }
}

#[async_trait]
impl ElementCounter for FakePage {
    async fn count(&self, strategy: &S) -> Result<usize, LocatorError> {
        let scheduled = {
            let state = self.state.lock().unwrap();
            state.counts.get(strategy).and_then(|counts| {
                counts
                    .iter()
                    .filter(|(at, _)| *at <= Instant::now())
                    .last()
                    .map(|(_, count)| *count)
            })
        };
        Ok(scheduled.unwrap_or_else(|| usize::from(self.element(strategy).is_some())))
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn is_visible(&self, target: &S) -> Result<bool, DriverError> {
        Ok(self.element(target).is_some())
    }

    async fn is_enabled(&self, target: &S) -> Result<bool, DriverError> {
        Ok(self
            .element(target)
            .is_some_and(|element| element.requires.iter().all(|field| self.filled(field))))
    }

    async fn click(&self, target: &S) -> Result<(), DriverError> {
        if self.element(target).is_none() {
            return Err(DriverError::interaction("click", target, "not attached"));
        }
        let mut state = self.state.lock().unwrap();
        state.clicks.push(target.clone());
        let reactions = state.reactions.get(target).cloned().unwrap_or_default();
        for reaction in reactions {
            match reaction {
                Reaction::Show(strategy, delay) => {
                    state.elements.insert(strategy, Element::after(delay));
                }
                Reaction::ShowRequiring(strategy, requires, delay) => {
                    let element = Element {
                        requires,
                        ..Element::after(delay)
                    };
                    state.elements.insert(strategy, element);
                }
                Reaction::Hide(strategy) => {
                    state.elements.remove(&strategy);
                }
                Reaction::Navigate(path) => state.url = format!("{BASE}{path}"),
                Reaction::Count(strategy, count, delay) => {
                    state
                        .counts
                        .entry(strategy)
                        .or_default()
                        .push((Instant::now() + delay, count));
                }
            }
        }
        Ok(())
    }

    async fn fill(&self, target: &S, value: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.fills.push((target.clone(), value.to_string()));
        state.values.insert(target.clone(), value.to_string());
        Ok(())
    }

    async fn goto(&self, path: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(path.to_string());
        state.url = format!("{BASE}{path}");
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().unwrap().url.clone())
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn heath() -> Credentials {
    Credentials::new("Heath93", "s3cret")
}

#[tokio::test(start_paused = true)]
async fn login_succeeds_once_a_signed_in_indicator_appears() {
    let page = FakePage::at("/signin");
    page.login_form().on_click(
        S::test_id("signin-submit"),
        vec![
            Reaction::Show(S::test_id("sidenav-home"), ms(300)),
            Reaction::Navigate("/".into()),
        ],
    );
    let session = Session::new(&page, FlowTimeouts::default());
    let login = session.login();

    login.goto().await.unwrap();
    let indicator = login.submit(&heath()).await.unwrap();

    assert_eq!(indicator, "sidenav-home");
    assert_eq!(page.clicks(), vec![S::test_id("signin-submit")]);
    assert_eq!(
        page.fills(),
        vec![
            (S::css("input#username"), "Heath93".to_string()),
            (S::css("input#password"), "s3cret".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn login_error_is_a_rejection_not_a_timeout() {
    let page = FakePage::at("/signin");
    page.login_form().on_click(
        S::test_id("signin-submit"),
        vec![Reaction::Show(
            S::css("[data-test*=\"signin-error\"], [data-testid*=\"signin-error\"]"),
            ms(250),
        )],
    );
    let session = Session::new(&page, FlowTimeouts::default());
    let started = Instant::now();

    let err = session.login().submit(&heath()).await.unwrap_err();

    assert_eq!(err.category(), FailureCategory::Rejected);
    assert_eq!(
        err,
        FlowError::Rejected {
            operation: "login".into(),
            indicator: "signin-error".into(),
        }
    );
    assert!(started.elapsed() < ms(1_000));
}

#[tokio::test(start_paused = true)]
async fn simultaneous_success_and_error_reports_the_error() {
    let page = FakePage::at("/signin");
    page.login_form().on_click(
        S::test_id("signin-submit"),
        vec![
            Reaction::Show(S::test_id("sidenav-home"), ms(400)),
            Reaction::Show(S::css("[role=\"alert\"]"), ms(400)),
        ],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    let result = session.login().attempt(&heath()).await.unwrap();

    assert_eq!(result, PollResult::Error("signin-error".into()));
}

#[tokio::test(start_paused = true)]
async fn silent_login_is_indeterminate_after_the_login_timeout() {
    let page = FakePage::at("/signin");
    page.login_form();
    let session = Session::new(&page, FlowTimeouts::default());
    let started = Instant::now();

    let err = session.login().submit(&heath()).await.unwrap_err();

    assert_eq!(
        err,
        FlowError::Indeterminate {
            operation: "login".into(),
            timeout_ms: 8_000,
        }
    );
    assert_eq!(err.category(), FailureCategory::Indeterminate);
    assert!(started.elapsed() >= ms(8_000) && started.elapsed() < ms(8_200));
}

#[tokio::test(start_paused = true)]
async fn submit_falls_back_to_the_text_strategy() {
    let page = FakePage::at("/signin");
    page.show(S::css("input#username"))
        .show(S::css("input#password"))
        .show(S::text("Sign In"))
        .on_click(
            S::text("Sign In"),
            vec![
                Reaction::Show(S::test_id("sidenav-username"), ms(100)),
                Reaction::Navigate("/".into()),
            ],
        );
    let session = Session::new(&page, FlowTimeouts::default());

    let indicator = session.login().submit(&heath()).await.unwrap();

    assert_eq!(indicator, "sidenav-username");
    assert_eq!(page.clicks(), vec![S::text("Sign In")]);
}

#[tokio::test(start_paused = true)]
async fn missing_control_names_every_strategy_tried() {
    let page = FakePage::at("/signin");
    let mut timeouts = FlowTimeouts::default();
    timeouts.expect = PollConfig::new(1_000, 100);
    let session = Session::new(&page, timeouts);

    let err = session.login().goto().await.unwrap_err();

    assert_eq!(err.category(), FailureCategory::MissingControl);
    assert_eq!(
        err.to_string(),
        "expected control username visible within 1000ms, found none of: primary css:input#username"
    );
}

#[tokio::test(start_paused = true)]
async fn remember_me_is_best_effort() {
    let page = FakePage::at("/signin");
    page.login_form().on_click(
        S::test_id("signin-submit"),
        vec![
            Reaction::Show(S::test_id("nav-home"), ms(100)),
            Reaction::Navigate("/".into()),
        ],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    let outcome = session.login().submit(&heath().remember_me()).await;

    assert_eq!(outcome, Ok("nav-home".to_string()));
}

#[tokio::test(start_paused = true)]
async fn logout_uses_the_first_available_sign_out_control() {
    let page = FakePage::at("/");
    page.show(S::role("button", "sign out")).on_click(
        S::role("button", "sign out"),
        vec![
            Reaction::Show(S::css("input#username"), ms(150)),
            Reaction::Navigate("/signin".into()),
        ],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    session.login().logout().await.unwrap();

    assert_eq!(page.clicks(), vec![S::role("button", "sign out")]);
}

#[tokio::test(start_paused = true)]
async fn contacts_navigation_uses_aria_label_fallback() {
    let page = FakePage::at("/");
    page.show(S::css("[aria-label=\"Contacts\"]")).on_click(
        S::css("[aria-label=\"Contacts\"]"),
        vec![Reaction::Show(S::text("contacts"), ms(200))],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    session.contacts().navigate().await.unwrap();

    assert_eq!(page.clicks(), vec![S::css("[aria-label=\"Contacts\"]")]);
}

#[tokio::test(start_paused = true)]
async fn selecting_first_contact_waits_for_detail_url() {
    let first_item = S::css("[data-test=\"transaction-list\"] [data-test^=\"transaction-item-\"]");
    let page = FakePage::at("/");
    page.show(S::test_id("nav-contacts-tab"))
        .on_click(
            S::test_id("nav-contacts-tab"),
            vec![
                Reaction::Show(S::text("contacts"), ms(100)),
                Reaction::Show(first_item.clone(), ms(100)),
            ],
        )
        .on_click(first_item.clone(), vec![Reaction::Navigate("/transaction/183VHWyuQMS".into())]);
    let session = Session::new(&page, FlowTimeouts::default());

    session.contacts().select_first_contact().await.unwrap();

    assert_eq!(page.clicks(), vec![S::test_id("nav-contacts-tab"), first_item]);
}

#[tokio::test(start_paused = true)]
async fn contact_selection_without_any_sign_is_indeterminate() {
    let page = FakePage::at("/transaction/183VHWyuQMS");
    let session = Session::new(&page, FlowTimeouts::default());

    let err = session.contacts().expect_contact_selected().await.unwrap_err();

    assert_eq!(
        err,
        FlowError::Indeterminate {
            operation: "contact-selected".into(),
            timeout_ms: 10_000,
        }
    );
}

fn amount() -> S {
    S::css("#amount")
}

fn note() -> S {
    S::css("#transaction-create-description-input")
}

/// New-transaction form served at `/transaction/new`; both submit controls
/// enable once amount and note hold a value
fn transaction_form(page: &FakePage) {
    let first_user = S::css("[data-test=\"users-list\"] [data-test^=\"user-list-item-\"]");
    page.show(S::test_id("nav-top-new-transaction"))
        .on_click(
            S::test_id("nav-top-new-transaction"),
            vec![
                Reaction::Show(first_user.clone(), ms(300)),
                Reaction::Navigate("/transaction/new".into()),
            ],
        )
        .on_click(
            first_user,
            vec![
                Reaction::Show(amount(), ms(50)),
                Reaction::Show(note(), ms(50)),
                Reaction::ShowRequiring(
                    S::test_id("transaction-create-submit-payment"),
                    vec![amount(), note()],
                    ms(50),
                ),
                Reaction::ShowRequiring(
                    S::test_id("transaction-create-submit-request"),
                    vec![amount(), note()],
                    ms(50),
                ),
            ],
        );
}

#[tokio::test(start_paused = true)]
async fn payment_is_confirmed_by_paid_text() {
    let page = FakePage::at("/");
    transaction_form(&page);
    page.on_click(
        S::test_id("transaction-create-submit-payment"),
        vec![Reaction::Show(S::text("paid"), ms(600))],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    let indicator = session
        .payments()
        .send_payment(&Transfer::new(25, "QA Automation Test Payment"))
        .await
        .unwrap();

    assert_eq!(indicator, "paid");
    assert!(page
        .fills()
        .contains(&(S::css("#amount"), "25".to_string())));
    assert_eq!(
        page.clicks().last(),
        Some(&S::test_id("transaction-create-submit-payment"))
    );
}

#[tokio::test(start_paused = true)]
async fn payment_helper_text_is_a_rejection() {
    let page = FakePage::at("/");
    transaction_form(&page);
    page.on_click(
        S::test_id("transaction-create-submit-payment"),
        vec![Reaction::Show(S::css("#transaction-create-amount-input-helper-text"), ms(100))],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    let err = session
        .payments()
        .send_payment(&Transfer::new(0, "zero"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FlowError::Rejected {
            operation: "payment".into(),
            indicator: "amount-error".into(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn request_is_confirmed_by_request_sent_text() {
    let page = FakePage::at("/");
    transaction_form(&page);
    page.on_click(
        S::test_id("transaction-create-submit-request"),
        vec![Reaction::Show(S::text("request sent"), ms(200))],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    let indicator = session
        .payments()
        .request_payment(&Transfer::new(10, "lunch"))
        .await
        .unwrap();

    assert_eq!(indicator, "request-sent");
}

#[tokio::test(start_paused = true)]
async fn feed_waits_for_the_transaction_amount() {
    let page = FakePage::at("/");
    page.show(S::test_id("transaction-list"))
        .show_after(S::text("$25"), ms(1_200));
    let session = Session::new(&page, FlowTimeouts::default());
    let feed = session.feed();

    feed.expect_loaded().await.unwrap();
    let indicator = feed.wait_for_transaction(25).await.unwrap();

    assert_eq!(indicator, "$25");
}

#[tokio::test(start_paused = true)]
async fn cancelled_session_interrupts_the_login_wait() {
    let page = FakePage::at("/signin");
    page.login_form();
    let cancel = CancellationToken::new();
    let session = Session::new(&page, FlowTimeouts::default()).with_cancellation(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ms(500)).await;
        trigger.cancel();
    });

    let err = session.login().attempt(&heath()).await.unwrap_err();

    assert_eq!(err.category(), FailureCategory::Interrupted);
}

#[tokio::test(start_paused = true)]
async fn hidden_control_stops_counting() {
    let page = FakePage::at("/");
    page.show(S::test_id("sidenav-home"))
        .on_click(S::test_id("sidenav-home"), vec![Reaction::Hide(S::test_id("sidenav-home"))]);
    let session = Session::new(&page, FlowTimeouts::default());

    let err = session.feed().navigate_home().await.unwrap_err();

    // transaction list never shows up
    assert_eq!(err.category(), FailureCategory::MissingControl);
    assert_eq!(page.count(&S::test_id("sidenav-home")).await, Ok(0));
}

#[tokio::test(start_paused = true)]
async fn form_url_alone_does_not_confirm_a_payment() {
    let page = FakePage::at("/");
    transaction_form(&page);
    let session = Session::new(&page, FlowTimeouts::default());

    let err = session
        .payments()
        .send_payment(&Transfer::new(25, "rent"))
        .await
        .unwrap_err();

    assert_eq!(page.url(), format!("{BASE}/transaction/new"));
    assert_eq!(
        err,
        FlowError::Indeterminate {
            operation: "payment".into(),
            timeout_ms: 15_000,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn transaction_detail_url_confirms_a_payment() {
    let page = FakePage::at("/");
    transaction_form(&page);
    page.on_click(
        S::test_id("transaction-create-submit-payment"),
        vec![Reaction::Navigate("/transaction/183VHWyuQMS".into())],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    let indicator = session
        .payments()
        .send_payment(&Transfer::new(25, "rent"))
        .await
        .unwrap();

    assert_eq!(indicator, "transaction-url");
}

#[tokio::test(start_paused = true)]
async fn payment_with_validation_waits_for_a_complete_form() {
    let page = FakePage::at("/");
    transaction_form(&page);
    page.on_click(
        S::test_id("transaction-create-submit-payment"),
        vec![Reaction::Show(S::text("payment sent"), ms(400))],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    let indicator = session
        .payments()
        .send_payment_with_validation(&Transfer::new(40, "groceries"))
        .await
        .unwrap();

    assert_eq!(indicator, "payment-sent");
    assert_eq!(
        page.clicks().last(),
        Some(&S::test_id("transaction-create-submit-payment"))
    );
}

#[tokio::test(start_paused = true)]
async fn transaction_form_keeps_submit_disabled_until_complete() {
    let page = FakePage::at("/");
    transaction_form(&page);
    let session = Session::new(&page, FlowTimeouts::default());
    let payments = session.payments();

    payments.open_form().await.unwrap();
    payments.expect_form_validation().await.unwrap();

    assert!(page.fills().contains(&(note(), "Test payment".to_string())));
}

#[tokio::test(start_paused = true)]
async fn always_enabled_submit_fails_form_validation() {
    let page = FakePage::at("/");
    page.show(amount())
        .show(note())
        .show(S::test_id("transaction-create-submit-payment"))
        .show(S::test_id("transaction-create-submit-request"));
    let mut timeouts = FlowTimeouts::default();
    timeouts.expect = PollConfig::new(1_000, 100);
    let session = Session::new(&page, timeouts);

    let err = session.payments().expect_form_validation().await.unwrap_err();

    assert_eq!(err.category(), FailureCategory::UnexpectedState);
    assert!(err
        .to_string()
        .starts_with("control pay-submit not disabled within 1000ms"));
}

#[tokio::test(start_paused = true)]
async fn helper_texts_follow_input_validity() {
    let page = FakePage::at("/");
    transaction_form(&page);
    page.validate(
        S::css("#transaction-create-amount-input-helper-text"),
        amount(),
        |value| value.parse::<u64>().map_or(true, |amount| amount == 0),
    )
    .validate(
        S::css("#transaction-create-description-input-helper-text"),
        note(),
        |value| value.trim().is_empty(),
    );
    let session = Session::new(&page, FlowTimeouts::default());
    let payments = session.payments();
    payments.open_form().await.unwrap();

    payments.validate_amount_input("0", false).await.unwrap();
    payments.validate_amount_input("25", true).await.unwrap();
    payments.validate_note_input("", false).await.unwrap();
    payments.validate_note_input("lunch", true).await.unwrap();

    let err = payments.validate_amount_input("abc", true).await.unwrap_err();
    assert_eq!(err.category(), FailureCategory::UnexpectedState);
    assert!(err.to_string().contains("control amount-error not hidden within 15000ms"));
}

#[tokio::test(start_paused = true)]
async fn login_submit_enables_once_both_fields_are_filled() {
    let page = FakePage::at("/signin");
    page.show(S::css("input#username"))
        .show(S::css("input#password"))
        .show(S::role("heading", "sign in"))
        .show_requiring(
            S::test_id("signin-submit"),
            vec![S::css("input#username"), S::css("input#password")],
        );
    let session = Session::new(&page, FlowTimeouts::default());

    session.login().expect_form_validation(&heath()).await.unwrap();

    assert_eq!(page.fills().len(), 2);
    assert!(page.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn login_error_message_is_checked_when_given() {
    let page = FakePage::at("/signin");
    page.login_form().on_click(
        S::test_id("signin-submit"),
        vec![
            Reaction::Show(S::css("[role=\"alert\"]"), ms(200)),
            Reaction::Show(S::text("Username or password is invalid"), ms(200)),
        ],
    );
    let mut timeouts = FlowTimeouts::default();
    timeouts.expect = PollConfig::new(1_000, 100);
    let session = Session::new(&page, timeouts);
    let login = session.login();

    let result = login.attempt(&heath()).await.unwrap();
    assert_eq!(result, PollResult::Error("signin-error".into()));

    login.expect_error(None).await.unwrap();
    login
        .expect_error(Some("Username or password is invalid"))
        .await
        .unwrap();
    let err = login.expect_error(Some("account locked")).await.unwrap_err();
    assert!(matches!(err, FlowError::ControlMissing { ref control, .. } if control == "signin-error-text"));
}

#[tokio::test(start_paused = true)]
async fn fill_waits_up_to_the_action_timeout() {
    let page = FakePage::at("/signin");
    page.show_after(S::css("input#username"), ms(20_000))
        .show(S::css("input#password"))
        .show(S::test_id("signin-submit"))
        .on_click(
            S::test_id("signin-submit"),
            vec![Reaction::Show(S::test_id("sidenav-home"), ms(100))],
        );
    let session = Session::new(&page, FlowTimeouts::default());
    let started = Instant::now();

    let result = session.login().attempt(&heath()).await.unwrap();

    assert_eq!(result, PollResult::Success("sidenav-home".into()));
    assert!(started.elapsed() >= ms(20_000));

    let mut timeouts = FlowTimeouts::default();
    timeouts.action = PollConfig::new(1_000, 100);
    let late = FakePage::at("/signin");
    late.show_after(S::css("input#username"), ms(20_000));
    let err = Session::new(&late, timeouts)
        .login()
        .attempt(&heath())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("username visible within 1000ms"));
}

#[tokio::test(start_paused = true)]
async fn feed_state_reports_an_empty_feed() {
    let page = FakePage::at("/");
    page.show_after(S::text("no transactions"), ms(300));
    let session = Session::new(&page, FlowTimeouts::default());

    assert_eq!(session.feed().state().await.unwrap(), FeedState::Empty);
}

#[tokio::test(start_paused = true)]
async fn feed_state_reports_a_populated_feed() {
    let page = FakePage::at("/");
    page.show_after(
        S::css("[data-test=\"transaction-list\"] [data-test^=\"transaction-item-\"]"),
        ms(300),
    );
    let session = Session::new(&page, FlowTimeouts::default());

    assert_eq!(session.feed().state().await.unwrap(), FeedState::Populated);
}

#[tokio::test(start_paused = true)]
async fn switching_tabs_waits_for_the_list() {
    let page = FakePage::at("/");
    page.show(S::test_id("nav-public-tab")).on_click(
        S::test_id("nav-public-tab"),
        vec![Reaction::Show(S::test_id("transaction-list"), ms(500))],
    );
    let session = Session::new(&page, FlowTimeouts::default());

    session.feed().switch_to(FeedTab::Public).await.unwrap();

    assert_eq!(page.clicks(), vec![S::test_id("nav-public-tab")]);
}

#[tokio::test(start_paused = true)]
async fn transaction_note_is_checked_when_given() {
    let page = FakePage::at("/");
    page.show(S::text("$25")).show_after(S::text("coffee"), ms(500));
    let mut timeouts = FlowTimeouts::default();
    timeouts.expect = PollConfig::new(1_000, 100);
    let session = Session::new(&page, timeouts);
    let feed = session.feed();

    feed.expect_transaction(25, Some("coffee")).await.unwrap();
    feed.expect_transaction(25, None).await.unwrap();

    let err = feed.expect_transaction(25, Some("rent")).await.unwrap_err();
    assert!(matches!(err, FlowError::ControlMissing { ref control, .. } if control == "transaction-note"));
}

fn transaction_items() -> S {
    S::css("[data-test=\"transaction-list\"] [data-test^=\"transaction-item-\"]")
}

#[tokio::test(start_paused = true)]
async fn load_more_waits_for_the_list_to_grow() {
    let page = FakePage::at("/");
    page.show(S::test_id("transaction-list"))
        .set_count(transaction_items(), 10)
        .show(S::text("Load more"))
        .on_click(
            S::text("Load more"),
            vec![Reaction::Count(transaction_items(), 20, ms(800))],
        );
    let session = Session::new(&page, FlowTimeouts::default());
    let started = Instant::now();

    let loaded = session.feed().load_more_transactions().await.unwrap();

    assert_eq!(loaded, Some(20));
    assert!(started.elapsed() >= ms(800));
}

#[tokio::test(start_paused = true)]
async fn load_more_is_skipped_when_not_offered() {
    let page = FakePage::at("/");
    page.show(S::test_id("transaction-list")).set_count(transaction_items(), 3);
    let session = Session::new(&page, FlowTimeouts::default());

    assert_eq!(session.feed().load_more_transactions().await.unwrap(), None);
    assert!(page.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn load_more_without_growth_is_indeterminate() {
    let page = FakePage::at("/");
    page.show(S::test_id("transaction-list"))
        .set_count(transaction_items(), 10)
        .show(S::text("Load more"));
    let session = Session::new(&page, FlowTimeouts::default());

    let err = session.feed().load_more_transactions().await.unwrap_err();

    assert_eq!(
        err,
        FlowError::Indeterminate {
            operation: "load-more".into(),
            timeout_ms: 15_000,
        }
    );
}
