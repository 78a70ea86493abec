//! Shared flow context

use crate::{
    contacts::ContactsFlow,
    driver::PageDriver,
    errors::FlowError,
    feed::FeedFlow,
    login::LoginFlow,
    outcome::{await_outcome, ensure_disabled, ensure_enabled, ensure_hidden, ensure_visible},
    payment::PaymentFlow,
    timeouts::FlowTimeouts,
};
use action_gate::ProbeSet;
use action_locator::{ResolvedLocator, SelectorSpec};
use probegate_core_types::PollConfig;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Page handle, timing and cancellation shared by every flow
///
/// Cheap to clone; flows each hold their own copy.
pub struct Session<'p, P: ?Sized> {
    page: &'p P,
    timeouts: FlowTimeouts,
    cancel: CancellationToken,
}

impl<P: ?Sized> Clone for Session<'_, P> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            timeouts: self.timeouts.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<'p, P> Session<'p, P>
where
    P: PageDriver + ?Sized + 'static,
{
    pub fn new(page: &'p P, timeouts: FlowTimeouts) -> Self {
        Self {
            page,
            timeouts,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort outcome waits once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn page(&self) -> &'p P {
        self.page
    }

    pub fn timeouts(&self) -> &FlowTimeouts {
        &self.timeouts
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn login(&self) -> LoginFlow<'p, P> {
        LoginFlow::new(self.clone())
    }

    pub fn payments(&self) -> PaymentFlow<'p, P> {
        PaymentFlow::new(self.clone())
    }

    pub fn contacts(&self) -> ContactsFlow<'p, P> {
        ContactsFlow::new(self.clone())
    }

    pub fn feed(&self) -> FeedFlow<'p, P> {
        FeedFlow::new(self.clone())
    }

    /// Poll `probes` under this session's cancellation and classify the result
    pub async fn await_outcome(
        &self,
        operation: &str,
        probes: &ProbeSet<P>,
        config: &PollConfig,
    ) -> Result<String, FlowError> {
        await_outcome(self.page, operation, probes, config, Some(&self.cancel)).await
    }

    pub async fn expect_visible(
        &self,
        control: &str,
        spec: &SelectorSpec,
    ) -> Result<ResolvedLocator, FlowError> {
        self.check_cancelled()?;
        ensure_visible(self.page, control, spec, &self.timeouts.expect).await
    }

    pub async fn expect_enabled(
        &self,
        control: &str,
        spec: &SelectorSpec,
    ) -> Result<ResolvedLocator, FlowError> {
        self.check_cancelled()?;
        ensure_enabled(self.page, control, spec, &self.timeouts.expect).await
    }

    pub async fn expect_disabled(
        &self,
        control: &str,
        spec: &SelectorSpec,
    ) -> Result<ResolvedLocator, FlowError> {
        self.check_cancelled()?;
        ensure_disabled(self.page, control, spec, &self.timeouts.expect).await
    }

    pub async fn expect_hidden(
        &self,
        control: &str,
        spec: &SelectorSpec,
    ) -> Result<ResolvedLocator, FlowError> {
        self.check_cancelled()?;
        ensure_hidden(self.page, control, spec, &self.timeouts.expect).await
    }

    /// Wait up to the action timeout for `control` to be visible, then
    /// replace its value
    pub async fn fill(&self, control: &str, spec: &SelectorSpec, value: &str) -> Result<(), FlowError> {
        self.check_cancelled()?;
        let locator = ensure_visible(self.page, control, spec, &self.timeouts.action).await?;
        debug!(control, locator = %locator, "filling");
        self.page.fill(&locator.strategy, value).await?;
        Ok(())
    }

    /// Wait for `control` to be enabled within `config`, then click it
    pub async fn click_when_enabled(
        &self,
        control: &str,
        spec: &SelectorSpec,
        config: &PollConfig,
    ) -> Result<ResolvedLocator, FlowError> {
        self.check_cancelled()?;
        let locator = ensure_enabled(self.page, control, spec, config).await?;
        debug!(control, locator = %locator, "clicking");
        self.page.click(&locator.strategy).await?;
        Ok(locator)
    }

    /// Wait for `control` to be visible within `config`, then click it
    pub async fn click_when_visible(
        &self,
        control: &str,
        spec: &SelectorSpec,
        config: &PollConfig,
    ) -> Result<ResolvedLocator, FlowError> {
        self.check_cancelled()?;
        let locator = ensure_visible(self.page, control, spec, config).await?;
        debug!(control, locator = %locator, "clicking");
        self.page.click(&locator.strategy).await?;
        Ok(locator)
    }

    fn check_cancelled(&self) -> Result<(), FlowError> {
        if self.cancel.is_cancelled() {
            return Err(FlowError::Interrupted("session cancelled".to_string()));
        }
        Ok(())
    }
}
