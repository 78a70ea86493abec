//! Composite helpers: resolve, wait, act, classify

use crate::{driver::PageDriver, errors::FlowError};
use action_gate::{poll, poll_until_cancelled, Probe, ProbeSet};
use action_locator::{resolve, ResolvedLocator, SelectionStrategy, SelectorSpec};
use futures::FutureExt;
use probegate_core_types::{OutcomeClass, PollConfig, PollResult};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Element state a probe or wait targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Visible,
    Enabled,
    /// Present but not enabled
    Disabled,
    /// Absent or not visible
    Hidden,
}

impl ControlState {
    pub fn name(&self) -> &'static str {
        match self {
            ControlState::Visible => "visible",
            ControlState::Enabled => "enabled",
            ControlState::Disabled => "disabled",
            ControlState::Hidden => "hidden",
        }
    }
}

/// Re-resolve `spec` and query `state` on whatever it resolves to
async fn resolved_state<P>(page: &P, spec: &SelectorSpec, state: ControlState) -> anyhow::Result<bool>
where
    P: PageDriver + ?Sized,
{
    let resolved = resolve(page, spec).await;
    if !resolved.is_present() {
        return Ok(state == ControlState::Hidden);
    }
    let ready = match state {
        ControlState::Visible => page.is_visible(&resolved.strategy).await?,
        ControlState::Enabled => page.is_enabled(&resolved.strategy).await?,
        ControlState::Disabled => !page.is_enabled(&resolved.strategy).await?,
        ControlState::Hidden => !page.is_visible(&resolved.strategy).await?,
    };
    Ok(ready)
}

async fn count_exceeds<P>(page: &P, spec: &SelectorSpec, floor: usize) -> anyhow::Result<bool>
where
    P: PageDriver + ?Sized,
{
    Ok(resolve(page, spec).await.count > floor)
}

/// Probe fired when `spec` resolves to an element in `state`
pub fn state_probe<P>(
    label: impl Into<String>,
    class: OutcomeClass,
    spec: SelectorSpec,
    state: ControlState,
) -> Probe<P>
where
    P: PageDriver + ?Sized + 'static,
{
    Probe::new(label, class, move |page: &P| {
        let spec = spec.clone();
        async move { resolved_state(page, &spec, state).await }.boxed()
    })
}

pub fn visible_probe<P>(label: impl Into<String>, class: OutcomeClass, spec: SelectorSpec) -> Probe<P>
where
    P: PageDriver + ?Sized + 'static,
{
    state_probe(label, class, spec, ControlState::Visible)
}

pub fn enabled_probe<P>(label: impl Into<String>, class: OutcomeClass, spec: SelectorSpec) -> Probe<P>
where
    P: PageDriver + ?Sized + 'static,
{
    state_probe(label, class, spec, ControlState::Enabled)
}

/// Probe fired once `spec` matches more than `floor` elements
pub fn count_probe<P>(label: impl Into<String>, class: OutcomeClass, spec: SelectorSpec, floor: usize) -> Probe<P>
where
    P: PageDriver + ?Sized + 'static,
{
    Probe::new(label, class, move |page: &P| {
        let spec = spec.clone();
        async move { count_exceeds(page, &spec, floor).await }.boxed()
    })
}

/// Probe fired when text containing `content` is visible
pub fn text_probe<P>(label: impl Into<String>, class: OutcomeClass, content: &str) -> Probe<P>
where
    P: PageDriver + ?Sized + 'static,
{
    visible_probe(label, class, SelectionStrategy::text(content).into())
}

/// Condition on the current page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlCheck {
    Contains(String),
    Excludes(String),
    /// Every check holds
    All(Vec<UrlCheck>),
}

impl UrlCheck {
    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlCheck::Contains(fragment) => url.contains(fragment.as_str()),
            UrlCheck::Excludes(fragment) => !url.contains(fragment.as_str()),
            UrlCheck::All(checks) => checks.iter().all(|check| check.matches(url)),
        }
    }
}

async fn url_matches<P>(page: &P, check: &UrlCheck) -> anyhow::Result<bool>
where
    P: PageDriver + ?Sized,
{
    let url = page.current_url().await?;
    Ok(check.matches(&url))
}

pub fn url_probe<P>(label: impl Into<String>, class: OutcomeClass, check: UrlCheck) -> Probe<P>
where
    P: PageDriver + ?Sized + 'static,
{
    Probe::new(label, class, move |page: &P| {
        let check = check.clone();
        async move { url_matches(page, &check).await }.boxed()
    })
}

/// Wait until `control` is visible and return its re-resolved locator.
pub async fn ensure_visible<P>(
    page: &P,
    control: &str,
    spec: &SelectorSpec,
    config: &PollConfig,
) -> Result<ResolvedLocator, FlowError>
where
    P: PageDriver + ?Sized + 'static,
{
    ensure_state(page, control, spec, ControlState::Visible, config).await
}

/// Wait until `control` is enabled and return its re-resolved locator.
pub async fn ensure_enabled<P>(
    page: &P,
    control: &str,
    spec: &SelectorSpec,
    config: &PollConfig,
) -> Result<ResolvedLocator, FlowError>
where
    P: PageDriver + ?Sized + 'static,
{
    ensure_state(page, control, spec, ControlState::Enabled, config).await
}

/// Wait until `control` is present but disabled.
pub async fn ensure_disabled<P>(
    page: &P,
    control: &str,
    spec: &SelectorSpec,
    config: &PollConfig,
) -> Result<ResolvedLocator, FlowError>
where
    P: PageDriver + ?Sized + 'static,
{
    ensure_state(page, control, spec, ControlState::Disabled, config).await
}

/// Wait until `control` is gone or no longer visible.
pub async fn ensure_hidden<P>(
    page: &P,
    control: &str,
    spec: &SelectorSpec,
    config: &PollConfig,
) -> Result<ResolvedLocator, FlowError>
where
    P: PageDriver + ?Sized + 'static,
{
    ensure_state(page, control, spec, ControlState::Hidden, config).await
}

async fn ensure_state<P>(
    page: &P,
    control: &str,
    spec: &SelectorSpec,
    state: ControlState,
    config: &PollConfig,
) -> Result<ResolvedLocator, FlowError>
where
    P: PageDriver + ?Sized + 'static,
{
    let probes = ProbeSet::new().with(state_probe(control, OutcomeClass::Success, spec.clone(), state));
    match poll(page, &probes, config).await {
        PollResult::Success(_) => {
            let resolved = resolve(page, spec).await;
            debug!(control, state = state.name(), locator = %resolved, "control ready");
            Ok(resolved)
        }
        PollResult::Error(_) | PollResult::Timeout => {
            let resolved = resolve(page, spec).await;
            if state == ControlState::Hidden || resolved.is_present() {
                Err(FlowError::UnexpectedState {
                    control: control.to_string(),
                    state: state.name().to_string(),
                    timeout_ms: config.timeout_ms,
                    locator: resolved.to_string(),
                })
            } else {
                Err(FlowError::ControlMissing {
                    control: control.to_string(),
                    state: state.name().to_string(),
                    timeout_ms: config.timeout_ms,
                    strategies: spec.describe(),
                })
            }
        }
    }
}

/// Map a poll result onto the flow outcome: the success label or a
/// classified failure.
pub fn expect_outcome(
    operation: &str,
    result: PollResult,
    config: &PollConfig,
) -> Result<String, FlowError> {
    match result {
        PollResult::Success(label) => {
            info!(operation, indicator = %label, "operation succeeded");
            Ok(label)
        }
        PollResult::Error(indicator) => Err(FlowError::Rejected {
            operation: operation.to_string(),
            indicator,
        }),
        PollResult::Timeout => Err(FlowError::Indeterminate {
            operation: operation.to_string(),
            timeout_ms: config.timeout_ms,
        }),
    }
}

/// Poll `probes` and classify the result, honouring `cancel` when given.
pub async fn await_outcome<P>(
    page: &P,
    operation: &str,
    probes: &ProbeSet<P>,
    config: &PollConfig,
    cancel: Option<&CancellationToken>,
) -> Result<String, FlowError>
where
    P: PageDriver + ?Sized,
{
    let result = match cancel {
        Some(token) => poll_until_cancelled(page, probes, config, token).await?,
        None => poll(page, probes, config).await,
    };
    expect_outcome(operation, result, config)
}

/// One "act, then wait for the outcome" step
pub struct ActionStep<P: ?Sized> {
    /// Operation name used in failures
    pub operation: String,

    /// Control clicked to trigger the operation
    pub control: String,
    pub target: SelectorSpec,

    /// Outcome indicators polled after the click
    pub probes: ProbeSet<P>,
    pub config: PollConfig,

    pub cancel: Option<CancellationToken>,
}

impl<P: ?Sized> ActionStep<P> {
    pub fn new(
        operation: impl Into<String>,
        control: impl Into<String>,
        target: SelectorSpec,
        probes: ProbeSet<P>,
        config: PollConfig,
    ) -> Self {
        Self {
            operation: operation.into(),
            control: control.into(),
            target,
            probes,
            config,
            cancel: None,
        }
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Wait for the step's control to be enabled, click it, then poll the
/// step's probes and classify the result.
pub async fn act_and_await<P>(page: &P, step: &ActionStep<P>) -> Result<String, FlowError>
where
    P: PageDriver + ?Sized + 'static,
{
    let locator = ensure_enabled(page, &step.control, &step.target, &step.config).await?;
    if locator.is_fallback() {
        debug!(control = %step.control, locator = %locator, "acting through fallback strategy");
    }
    page.click(&locator.strategy).await?;

    await_outcome(
        page,
        &step.operation,
        &step.probes,
        &step.config,
        step.cancel.as_ref(),
    )
    .await
}
