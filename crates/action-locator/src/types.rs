//! Core types for locator system

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rule for finding UI elements
///
/// Mirrors the ways a page object names a control:
/// - Css: raw CSS selector
/// - TestId: `data-test` / `data-testid` attribute value
/// - Role: ARIA role plus accessible name (case-insensitive substring)
/// - Text: visible text content (exact or partial)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// CSS selector
    Css { selector: String },

    /// Test id attribute
    TestId { id: String },

    /// ARIA role and accessible name
    Role { role: String, name: String },

    /// Text content (exact or partial match)
    Text { content: String, exact: bool },
}

impl SelectionStrategy {
    pub fn css(selector: impl Into<String>) -> Self {
        SelectionStrategy::Css {
            selector: selector.into(),
        }
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        SelectionStrategy::TestId { id: id.into() }
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        SelectionStrategy::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Partial, case-insensitive text match
    pub fn text(content: impl Into<String>) -> Self {
        SelectionStrategy::Text {
            content: content.into(),
            exact: false,
        }
    }

    pub fn exact_text(content: impl Into<String>) -> Self {
        SelectionStrategy::Text {
            content: content.into(),
            exact: true,
        }
    }

    /// Get strategy kind as string
    pub fn kind(&self) -> &'static str {
        match self {
            SelectionStrategy::Css { .. } => "css",
            SelectionStrategy::TestId { .. } => "testid",
            SelectionStrategy::Role { .. } => "role",
            SelectionStrategy::Text { .. } => "text",
        }
    }

    /// Equivalent CSS selector for CSS-only drivers.
    ///
    /// Role and text strategies have no CSS form and return `None`.
    pub fn css_equivalent(&self) -> Option<String> {
        match self {
            SelectionStrategy::Css { selector } => Some(selector.clone()),
            SelectionStrategy::TestId { id } => {
                let quoted = serde_json::to_string(id).unwrap_or_else(|_| "\"\"".to_string());
                Some(format!("[data-test={quoted}], [data-testid={quoted}]"))
            }
            SelectionStrategy::Role { .. } | SelectionStrategy::Text { .. } => None,
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionStrategy::Css { selector } => write!(f, "css:{selector}"),
            SelectionStrategy::TestId { id } => write!(f, "testid:{id}"),
            SelectionStrategy::Role { role, name } => write!(f, "role:{role}[name~='{name}']"),
            SelectionStrategy::Text { content, exact } => {
                if *exact {
                    write!(f, "text:exact:'{content}'")
                } else {
                    write!(f, "text:partial:'{content}'")
                }
            }
        }
    }
}

/// Position of a strategy within a [`SelectorSpec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategySlot {
    Primary,

    /// Zero-based index into the fallback list
    Fallback(usize),
}

impl fmt::Display for StrategySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategySlot::Primary => f.write_str("primary"),
            StrategySlot::Fallback(idx) => write!(f, "fallback#{}", idx + 1),
        }
    }
}

/// Ordered candidate strategies: one primary, zero or more fallbacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSpec {
    /// Preferred strategy
    pub primary: SelectionStrategy,

    /// Tried in order when the primary matches nothing
    #[serde(default)]
    pub fallbacks: Vec<SelectionStrategy>,
}

impl SelectorSpec {
    /// Create a spec with primary strategy only
    pub fn new(primary: SelectionStrategy) -> Self {
        Self {
            primary,
            fallbacks: Vec::new(),
        }
    }

    /// Append a fallback strategy
    pub fn or(mut self, fallback: SelectionStrategy) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    /// All strategies in evaluation order
    pub fn strategies(&self) -> impl Iterator<Item = (StrategySlot, &SelectionStrategy)> {
        std::iter::once((StrategySlot::Primary, &self.primary)).chain(
            self.fallbacks
                .iter()
                .enumerate()
                .map(|(idx, strategy)| (StrategySlot::Fallback(idx), strategy)),
        )
    }

    /// Strategy stored at `slot`, if any
    pub fn get(&self, slot: StrategySlot) -> Option<&SelectionStrategy> {
        match slot {
            StrategySlot::Primary => Some(&self.primary),
            StrategySlot::Fallback(idx) => self.fallbacks.get(idx),
        }
    }

    pub fn len(&self) -> usize {
        1 + self.fallbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Human-readable list of every strategy, for failure messages
    pub fn describe(&self) -> String {
        self.strategies()
            .map(|(slot, strategy)| format!("{slot} {strategy}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<SelectionStrategy> for SelectorSpec {
    fn from(primary: SelectionStrategy) -> Self {
        SelectorSpec::new(primary)
    }
}

/// Point-in-time resolution snapshot
///
/// Not a live binding: re-resolve when the page may have changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocator {
    /// Strategy that was chosen
    pub strategy: SelectionStrategy,

    /// Where the chosen strategy sits in the spec
    pub slot: StrategySlot,

    /// Matching elements observed at resolution time
    pub count: usize,
}

impl ResolvedLocator {
    pub fn new(strategy: SelectionStrategy, slot: StrategySlot, count: usize) -> Self {
        Self {
            strategy,
            slot,
            count,
        }
    }

    /// At least one element matched
    pub fn is_present(&self) -> bool {
        self.count > 0
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.slot, StrategySlot::Fallback(_))
    }
}

impl fmt::Display for ResolvedLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({} match(es))", self.slot, self.strategy, self.count)
    }
}
