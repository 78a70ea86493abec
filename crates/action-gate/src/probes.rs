//! Probe model for outcome polling

use action_locator::{resolve, ElementCounter, SelectorSpec};
use futures::future::BoxFuture;
use futures::FutureExt;
use probegate_core_types::OutcomeClass;
use std::fmt;

/// Future returned by a probe check. `Err` counts as "not yet true".
pub type ProbeFuture<'a> = BoxFuture<'a, anyhow::Result<bool>>;

/// Read-only observation evaluated once per sweep
///
/// The context is passed explicitly on every call; checks must not keep
/// mutable state between sweeps.
pub trait ProbeCheck<C: ?Sized>: Send + Sync {
    fn check<'a>(&'a self, ctx: &'a C) -> ProbeFuture<'a>;
}

struct FnCheck<F>(F);

impl<C, F> ProbeCheck<C> for FnCheck<F>
where
    C: ?Sized,
    F: for<'a> Fn(&'a C) -> ProbeFuture<'a> + Send + Sync,
{
    fn check<'a>(&'a self, ctx: &'a C) -> ProbeFuture<'a> {
        (self.0)(ctx)
    }
}

/// Labelled check tagged with the outcome it indicates
pub struct Probe<C: ?Sized> {
    label: String,
    class: OutcomeClass,
    check: Box<dyn ProbeCheck<C>>,
}

impl<C: ?Sized> Probe<C> {
    /// Create a probe from a closure returning a boxed future
    pub fn new<F>(label: impl Into<String>, class: OutcomeClass, check: F) -> Self
    where
        F: for<'a> Fn(&'a C) -> ProbeFuture<'a> + Send + Sync + 'static,
    {
        Self::from_check(label, class, FnCheck(check))
    }

    /// Create a probe from a [`ProbeCheck`] implementation
    pub fn from_check(
        label: impl Into<String>,
        class: OutcomeClass,
        check: impl ProbeCheck<C> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            class,
            check: Box::new(check),
        }
    }

    pub fn success<F>(label: impl Into<String>, check: F) -> Self
    where
        F: for<'a> Fn(&'a C) -> ProbeFuture<'a> + Send + Sync + 'static,
    {
        Self::new(label, OutcomeClass::Success, check)
    }

    pub fn error<F>(label: impl Into<String>, check: F) -> Self
    where
        F: for<'a> Fn(&'a C) -> ProbeFuture<'a> + Send + Sync + 'static,
    {
        Self::new(label, OutcomeClass::Error, check)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn class(&self) -> OutcomeClass {
        self.class
    }

    /// Run the check once
    pub fn check<'a>(&'a self, ctx: &'a C) -> ProbeFuture<'a> {
        self.check.check(ctx)
    }
}

impl<C: ?Sized> fmt::Debug for Probe<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("label", &self.label)
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}

/// Probe fired when `spec` resolves to at least one element.
///
/// Re-resolves on every sweep, so fallbacks are picked up as the page
/// settles.
pub fn presence_probe<C>(label: impl Into<String>, class: OutcomeClass, spec: SelectorSpec) -> Probe<C>
where
    C: ElementCounter + ?Sized + 'static,
{
    Probe::new(label, class, move |ctx: &C| {
        let spec = spec.clone();
        async move { Ok(resolve(ctx, &spec).await.is_present()) }.boxed()
    })
}

/// Probes handed to one poll
///
/// Built per call site and consumed by a single poll.
pub struct ProbeSet<C: ?Sized> {
    probes: Vec<Probe<C>>,
}

impl<C: ?Sized> ProbeSet<C> {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Add a probe
    pub fn with(mut self, probe: Probe<C>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Add a success indicator
    pub fn success<F>(self, label: impl Into<String>, check: F) -> Self
    where
        F: for<'a> Fn(&'a C) -> ProbeFuture<'a> + Send + Sync + 'static,
    {
        self.with(Probe::success(label, check))
    }

    /// Add an error indicator
    pub fn error<F>(self, label: impl Into<String>, check: F) -> Self
    where
        F: for<'a> Fn(&'a C) -> ProbeFuture<'a> + Send + Sync + 'static,
    {
        self.with(Probe::error(label, check))
    }

    pub fn push(&mut self, probe: Probe<C>) {
        self.probes.push(probe);
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Number of error-tagged probes
    pub fn error_count(&self) -> usize {
        self.count_of(OutcomeClass::Error)
    }

    pub fn count_of(&self, class: OutcomeClass) -> usize {
        self.probes.iter().filter(|p| p.class() == class).count()
    }

    pub fn get(&self, idx: usize) -> Option<&Probe<C>> {
        self.probes.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Probe<C>> {
        self.probes.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.probes.iter().map(Probe::label).collect()
    }
}

impl<C: ?Sized> Default for ProbeSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> FromIterator<Probe<C>> for ProbeSet<C> {
    fn from_iter<I: IntoIterator<Item = Probe<C>>>(iter: I) -> Self {
        Self {
            probes: iter.into_iter().collect(),
        }
    }
}

impl<C: ?Sized> Extend<Probe<C>> for ProbeSet<C> {
    fn extend<I: IntoIterator<Item = Probe<C>>>(&mut self, iter: I) {
        self.probes.extend(iter);
    }
}

impl<C: ?Sized> fmt::Debug for ProbeSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.probes.iter()).finish()
    }
}
