//! Transaction feed

use crate::{
    driver::PageDriver,
    errors::FlowError,
    outcome::{count_probe, text_probe, visible_probe},
    selectors,
    session::Session,
};
use action_gate::ProbeSet;
use action_locator::{resolve, SelectionStrategy, SelectorSpec};
use probegate_core_types::OutcomeClass;
use tracing::{debug, info};

/// Feed tabs reachable from the home view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTab {
    Personal,
    Public,
    Contacts,
}

impl FeedTab {
    fn control(&self) -> (&'static str, SelectorSpec) {
        match self {
            FeedTab::Personal => ("personal-tab", selectors::personal_tab()),
            FeedTab::Public => ("public-tab", selectors::public_tab()),
            FeedTab::Contacts => ("contacts-tab", selectors::contacts_tab()),
        }
    }
}

/// Feed state once loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// At least one transaction listed
    Populated,
    Empty,
}

pub struct FeedFlow<'p, P: ?Sized> {
    session: Session<'p, P>,
}

impl<'p, P> FeedFlow<'p, P>
where
    P: PageDriver + ?Sized + 'static,
{
    pub fn new(session: Session<'p, P>) -> Self {
        Self { session }
    }

    /// Wait for the transaction list
    pub async fn expect_loaded(&self) -> Result<(), FlowError> {
        self.session
            .expect_visible("transaction-list", &selectors::transaction_list())
            .await?;
        Ok(())
    }

    /// Go back to the home feed
    pub async fn navigate_home(&self) -> Result<(), FlowError> {
        self.session
            .click_when_visible("sidenav-home", &selectors::sidenav_home(), &self.session.timeouts().navigation)
            .await?;
        self.expect_loaded().await
    }

    pub async fn switch_to(&self, tab: FeedTab) -> Result<(), FlowError> {
        let (control, spec) = tab.control();
        self.session
            .click_when_visible(control, &spec, &self.session.timeouts().navigation)
            .await?;
        debug!(?tab, "feed tab switched");
        self.expect_loaded().await
    }

    /// Classify the loaded feed as populated or empty
    pub async fn state(&self) -> Result<FeedState, FlowError> {
        let probes = ProbeSet::new()
            .with(visible_probe(
                "first-transaction",
                OutcomeClass::Success,
                selectors::first_transaction_item(),
            ))
            .with(visible_probe("empty-feed", OutcomeClass::Success, selectors::empty_feed()));

        let indicator = self
            .session
            .await_outcome("feed-state", &probes, &self.session.timeouts().expect)
            .await?;
        Ok(if indicator == "empty-feed" {
            FeedState::Empty
        } else {
            FeedState::Populated
        })
    }

    /// Number of listed transactions once the list is visible
    pub async fn transaction_count(&self) -> Result<usize, FlowError> {
        self.expect_loaded().await?;
        Ok(resolve(self.session.page(), &selectors::transaction_items()).await.count)
    }

    /// Click "load more" when offered and wait for the list to grow.
    ///
    /// Returns the new count, or `None` when the feed offers no more.
    pub async fn load_more_transactions(&self) -> Result<Option<usize>, FlowError> {
        let before = self.transaction_count().await?;

        let page = self.session.page();
        let button = resolve(page, &selectors::load_more()).await;
        if !button.is_present() || !page.is_visible(&button.strategy).await? {
            debug!(before, "no load-more control, feed complete");
            return Ok(None);
        }
        page.click(&button.strategy).await?;

        let grown = ProbeSet::new().with(count_probe(
            "list-grew",
            OutcomeClass::Success,
            selectors::transaction_items(),
            before,
        ));
        self.session
            .await_outcome("load-more", &grown, &self.session.timeouts().expect)
            .await?;

        let after = self.transaction_count().await?;
        info!(before, after, "more transactions loaded");
        Ok(Some(after))
    }

    /// Wait until a transaction of `amount` dollars is visible.
    ///
    /// Returns the matched indicator label.
    pub async fn wait_for_transaction(&self, amount: u64) -> Result<String, FlowError> {
        let content = format!("${amount}");
        let probes = ProbeSet::new().with(text_probe(content.clone(), OutcomeClass::Success, &content));

        self.session
            .await_outcome("transaction-visible", &probes, &self.session.timeouts().expect)
            .await
    }

    /// Wait for a transaction by amount and, when given, its note
    pub async fn expect_transaction(&self, amount: u64, note: Option<&str>) -> Result<(), FlowError> {
        self.wait_for_transaction(amount).await?;
        if let Some(note) = note {
            self.session
                .expect_visible("transaction-note", &SelectionStrategy::text(note).into())
                .await?;
        }
        Ok(())
    }
}
