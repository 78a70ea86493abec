//! Contacts tab and contact selection

use crate::{
    driver::PageDriver,
    errors::FlowError,
    outcome::{text_probe, url_probe, visible_probe, UrlCheck},
    selectors,
    session::Session,
};
use action_gate::ProbeSet;
use probegate_core_types::OutcomeClass;
use tracing::info;

pub struct ContactsFlow<'p, P: ?Sized> {
    session: Session<'p, P>,
}

impl<'p, P> ContactsFlow<'p, P>
where
    P: PageDriver + ?Sized + 'static,
{
    pub fn new(session: Session<'p, P>) -> Self {
        Self { session }
    }

    /// Open the contacts tab through the first strategy the page supports
    pub async fn navigate(&self) -> Result<(), FlowError> {
        let navigation = &self.session.timeouts().navigation;
        let locator = self
            .session
            .click_when_enabled("contacts-tab", &selectors::contacts_tab(), navigation)
            .await?;

        let landed = ProbeSet::new().with(text_probe("contacts-heading", OutcomeClass::Success, "contacts"));
        self.session.await_outcome("open-contacts", &landed, navigation).await?;
        info!(locator = %locator, "contacts opened");
        Ok(())
    }

    pub async fn expect_loaded(&self) -> Result<(), FlowError> {
        self.session.expect_visible("contacts-heading", &selectors::contacts_heading()).await?;
        self.session.expect_visible("transaction-list", &selectors::transaction_list()).await?;
        Ok(())
    }

    /// Open contacts and click the first listed item, then wait for its
    /// detail view.
    pub async fn select_first_contact(&self) -> Result<(), FlowError> {
        self.navigate().await?;

        let contact = &self.session.timeouts().contact;
        self.session
            .click_when_visible("first-contact", &selectors::first_transaction_item(), contact)
            .await?;

        let detail = ProbeSet::new().with(url_probe(
            "transaction-detail",
            OutcomeClass::Success,
            UrlCheck::Contains("/transaction/".into()),
        ));
        self.session.await_outcome("select-contact", &detail, contact).await?;
        Ok(())
    }

    /// Wait for any sign that a contact is selected.
    ///
    /// Success-only: there is no error indicator, so failure is always
    /// [`FlowError::Indeterminate`].
    pub async fn expect_contact_selected(&self) -> Result<String, FlowError> {
        let probes = ProbeSet::new()
            .with(visible_probe("user-profile", OutcomeClass::Success, selectors::user_profile()))
            .with(visible_probe("contact-info", OutcomeClass::Success, selectors::contact_info()))
            .with(text_probe("pay-action", OutcomeClass::Success, "pay"));

        self.session
            .await_outcome("contact-selected", &probes, &self.session.timeouts().contact)
            .await
    }
}
