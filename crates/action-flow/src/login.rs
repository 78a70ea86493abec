//! Sign-in and sign-out

use crate::{
    driver::PageDriver,
    errors::FlowError,
    outcome::{expect_outcome, url_probe, visible_probe, UrlCheck},
    selectors,
    session::Session,
};
use action_gate::{poll_until_cancelled, ProbeSet};
use action_locator::{resolve, SelectionStrategy};
use probegate_core_types::{OutcomeClass, PollConfig, PollResult};
use std::fmt;
use tracing::{debug, info, warn};

/// Grace period for post-login and post-logout confirmations
const CONFIRM_TIMEOUT_MS: u64 = 5_000;
const LOGOUT_TIMEOUT_MS: u64 = 2_000;

/// Login form input
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    pub fn remember_me(mut self) -> Self {
        self.remember_me = true;
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

pub struct LoginFlow<'p, P: ?Sized> {
    session: Session<'p, P>,
}

impl<'p, P> LoginFlow<'p, P>
where
    P: PageDriver + ?Sized + 'static,
{
    pub fn new(session: Session<'p, P>) -> Self {
        Self { session }
    }

    /// Open the application root and wait for the login form
    pub async fn goto(&self) -> Result<(), FlowError> {
        self.session.page().goto("/").await?;
        self.expect_form_visible().await
    }

    pub async fn expect_form_visible(&self) -> Result<(), FlowError> {
        self.session.expect_visible("username", &selectors::username_input()).await?;
        self.session.expect_visible("password", &selectors::password_input()).await?;
        self.session.expect_visible("signin-submit", &selectors::signin_submit()).await?;
        self.session.expect_visible("signin-heading", &selectors::signin_heading()).await?;
        Ok(())
    }

    /// Sign in and require success.
    ///
    /// Returns the label of the indicator that confirmed the session.
    pub async fn submit(&self, credentials: &Credentials) -> Result<String, FlowError> {
        let config = self.session.timeouts().login.clone();
        let result = self.attempt(credentials).await?;
        let indicator = expect_outcome("login", result, &config)?;

        // home link is a courtesy wait, the URL check below is authoritative
        let home = ProbeSet::new().with(visible_probe("home-link", OutcomeClass::Success, selectors::home_link()));
        let grace = self.confirm_config(CONFIRM_TIMEOUT_MS);
        match poll_until_cancelled(self.session.page(), &home, &grace, self.session.cancel_token()).await? {
            PollResult::Success(_) => {}
            _ => debug!("home link not visible after login, continuing"),
        }

        let left_signin = ProbeSet::new().with(url_probe(
            "left-signin",
            OutcomeClass::Success,
            UrlCheck::Excludes("/signin".into()),
        ));
        self.session
            .await_outcome("leave-signin", &left_signin, &self.session.timeouts().navigation)
            .await?;

        info!(username = %credentials.username, indicator = %indicator, "signed in");
        Ok(indicator)
    }

    /// Sign in and report the raw outcome without raising on rejection or
    /// timeout.
    pub async fn attempt(&self, credentials: &Credentials) -> Result<PollResult, FlowError> {
        self.fill_form(credentials).await?;

        let config = &self.session.timeouts().login;
        self.session
            .click_when_enabled("signin-submit", &selectors::signin_submit(), config)
            .await?;

        let result = poll_until_cancelled(
            self.session.page(),
            &login_outcome_probes(),
            config,
            self.session.cancel_token(),
        )
        .await?;
        debug!(username = %credentials.username, %result, "login attempt classified");
        Ok(result)
    }

    /// Wait for the sign-in error indicator and, when given, `message`
    /// somewhere on the page
    pub async fn expect_error(&self, message: Option<&str>) -> Result<(), FlowError> {
        self.session.expect_visible("signin-error", &selectors::signin_error()).await?;
        if let Some(message) = message {
            self.session
                .expect_visible("signin-error-text", &SelectionStrategy::text(message).into())
                .await?;
        }
        Ok(())
    }

    /// Submit stays disabled with an empty form and with only the username,
    /// and enables once the password is filled too.
    pub async fn expect_form_validation(&self, credentials: &Credentials) -> Result<(), FlowError> {
        let submit = selectors::signin_submit();

        self.session.expect_disabled("signin-submit", &submit).await?;
        self.session
            .fill("username", &selectors::username_input(), &credentials.username)
            .await?;
        self.session.expect_disabled("signin-submit", &submit).await?;
        self.session
            .fill("password", &selectors::password_input(), &credentials.password)
            .await?;
        self.session.expect_enabled("signin-submit", &submit).await?;
        Ok(())
    }

    /// Sign out through whichever control the page offers and wait for the
    /// login form.
    pub async fn logout(&self) -> Result<(), FlowError> {
        let config = self.confirm_config(LOGOUT_TIMEOUT_MS);
        let locator = self
            .session
            .click_when_visible("sign-out", &selectors::sign_out(), &config)
            .await?;
        debug!(locator = %locator, "sign-out clicked");

        let form = ProbeSet::new().with(visible_probe(
            "login-form",
            OutcomeClass::Success,
            selectors::username_input(),
        ));
        self.session.await_outcome("logout", &form, &config).await?;
        info!("signed out");
        Ok(())
    }

    pub async fn clear_form(&self) -> Result<(), FlowError> {
        self.session.fill("username", &selectors::username_input(), "").await?;
        self.session.fill("password", &selectors::password_input(), "").await
    }

    async fn fill_form(&self, credentials: &Credentials) -> Result<(), FlowError> {
        self.session
            .fill("username", &selectors::username_input(), &credentials.username)
            .await?;
        self.session
            .fill("password", &selectors::password_input(), &credentials.password)
            .await?;

        if credentials.remember_me {
            self.tick_remember_me().await;
        }
        Ok(())
    }

    /// Best effort: a missing or unclickable checkbox does not fail the login
    async fn tick_remember_me(&self) {
        let page = self.session.page();
        let locator = resolve(page, &selectors::remember_me()).await;
        if !locator.is_present() {
            warn!("remember-me control not found, skipping");
            return;
        }
        if let Err(err) = page.click(&locator.strategy).await {
            warn!(error = %err, "could not tick remember-me, skipping");
        }
    }

    fn confirm_config(&self, timeout_ms: u64) -> PollConfig {
        PollConfig::new(timeout_ms, self.session.timeouts().login.interval_ms)
    }
}

/// Signed-in indicators raced against the sign-in error
pub fn login_outcome_probes<P>() -> ProbeSet<P>
where
    P: PageDriver + ?Sized + 'static,
{
    let mut probes: ProbeSet<P> = selectors::signed_in_indicators()
        .into_iter()
        .map(|(label, spec)| visible_probe(label, OutcomeClass::Success, spec))
        .collect();
    probes.push(visible_probe("signin-error", OutcomeClass::Error, selectors::signin_error()));
    probes
}
