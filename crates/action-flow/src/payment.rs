//! New-transaction form: pay and request

use crate::{
    driver::PageDriver,
    errors::FlowError,
    outcome::{act_and_await, text_probe, url_probe, visible_probe, ActionStep, UrlCheck},
    selectors,
    session::Session,
};
use action_gate::ProbeSet;
use action_locator::SelectorSpec;
use probegate_core_types::OutcomeClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Amount and note entered on the transaction form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Whole dollars
    pub amount: u64,
    pub note: String,
}

impl Transfer {
    pub fn new(amount: u64, note: impl Into<String>) -> Self {
        Self {
            amount,
            note: note.into(),
        }
    }
}

/// Which submit control the form is sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Payment,
    Request,
}

impl TransferKind {
    pub fn operation(&self) -> &'static str {
        match self {
            TransferKind::Payment => "payment",
            TransferKind::Request => "request",
        }
    }

    fn submit_control(&self) -> (&'static str, SelectorSpec) {
        match self {
            TransferKind::Payment => ("pay-submit", selectors::pay_submit()),
            TransferKind::Request => ("request-submit", selectors::request_submit()),
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

pub struct PaymentFlow<'p, P: ?Sized> {
    session: Session<'p, P>,
}

impl<'p, P> PaymentFlow<'p, P>
where
    P: PageDriver + ?Sized + 'static,
{
    pub fn new(session: Session<'p, P>) -> Self {
        Self { session }
    }

    /// Open the new-transaction form and pick the first listed user
    pub async fn open_form(&self) -> Result<(), FlowError> {
        let navigation = &self.session.timeouts().navigation;
        self.session
            .click_when_visible("new-transaction", &selectors::new_transaction(), navigation)
            .await?;
        self.session
            .click_when_visible("first-user", &selectors::first_user_item(), &self.session.timeouts().contact)
            .await?;
        self.session.expect_visible("amount", &selectors::amount_input()).await?;
        self.session.expect_visible("note", &selectors::note_input()).await?;
        Ok(())
    }

    /// Send a payment and wait for confirmation.
    ///
    /// Returns the label of the indicator that confirmed it.
    pub async fn send_payment(&self, transfer: &Transfer) -> Result<String, FlowError> {
        self.submit(TransferKind::Payment, transfer).await
    }

    /// Request a payment and wait for confirmation
    pub async fn request_payment(&self, transfer: &Transfer) -> Result<String, FlowError> {
        self.submit(TransferKind::Request, transfer).await
    }

    /// Fill the form without submitting
    pub async fn fill_form(&self, transfer: &Transfer) -> Result<(), FlowError> {
        self.session
            .fill("amount", &selectors::amount_input(), &transfer.amount.to_string())
            .await?;
        self.session.fill("note", &selectors::note_input(), &transfer.note).await
    }

    pub async fn clear_form(&self) -> Result<(), FlowError> {
        self.session.fill("amount", &selectors::amount_input(), "").await?;
        self.session.fill("note", &selectors::note_input(), "").await
    }

    /// Send a payment while checking that the pay control only enables once
    /// both amount and note are filled.
    pub async fn send_payment_with_validation(&self, transfer: &Transfer) -> Result<String, FlowError> {
        let (control, target) = TransferKind::Payment.submit_control();
        self.open_form().await?;

        self.session.expect_disabled(control, &target).await?;
        self.session
            .fill("amount", &selectors::amount_input(), &transfer.amount.to_string())
            .await?;
        self.session.expect_disabled(control, &target).await?;
        self.session.fill("note", &selectors::note_input(), &transfer.note).await?;

        self.confirm(TransferKind::Payment, transfer).await
    }

    /// On an open, empty form: both submit controls stay disabled for a zero
    /// amount and for a missing note, and pay enables once the form is
    /// complete.
    pub async fn expect_form_validation(&self) -> Result<(), FlowError> {
        self.expect_submit_disabled().await?;
        self.session.fill("amount", &selectors::amount_input(), "0").await?;
        self.expect_submit_disabled().await?;
        self.session.fill("amount", &selectors::amount_input(), "25").await?;
        self.expect_submit_disabled().await?;
        self.session.fill("note", &selectors::note_input(), "Test payment").await?;

        let (pay, pay_target) = TransferKind::Payment.submit_control();
        self.session.expect_enabled(pay, &pay_target).await?;
        Ok(())
    }

    async fn expect_submit_disabled(&self) -> Result<(), FlowError> {
        for kind in [TransferKind::Payment, TransferKind::Request] {
            let (control, target) = kind.submit_control();
            self.session.expect_disabled(control, &target).await?;
        }
        Ok(())
    }

    /// Enter `amount` and wait for its helper text to show (invalid) or stay
    /// away (valid).
    pub async fn validate_amount_input(&self, amount: &str, valid: bool) -> Result<(), FlowError> {
        self.session.fill("amount", &selectors::amount_input(), amount).await?;
        self.expect_helper("amount-error", &selectors::amount_error(), valid).await
    }

    /// Enter `note` and wait for its helper text to show (invalid) or stay
    /// away (valid).
    pub async fn validate_note_input(&self, note: &str, valid: bool) -> Result<(), FlowError> {
        self.session.fill("note", &selectors::note_input(), note).await?;
        self.expect_helper("note-error", &selectors::note_error(), valid).await
    }

    async fn expect_helper(&self, control: &str, spec: &SelectorSpec, valid: bool) -> Result<(), FlowError> {
        if valid {
            self.session.expect_hidden(control, spec).await?;
        } else {
            self.session.expect_visible(control, spec).await?;
        }
        Ok(())
    }

    async fn submit(&self, kind: TransferKind, transfer: &Transfer) -> Result<String, FlowError> {
        self.open_form().await?;
        self.fill_form(transfer).await?;
        self.confirm(kind, transfer).await
    }

    async fn confirm(&self, kind: TransferKind, transfer: &Transfer) -> Result<String, FlowError> {
        let (control, target) = kind.submit_control();
        let step = ActionStep::new(
            kind.operation(),
            control,
            target,
            transfer_outcome_probes(kind),
            self.session.timeouts().payment.clone(),
        )
        .cancel_on(self.session.cancel_token().clone());

        let indicator = act_and_await(self.session.page(), &step).await?;
        info!(kind = %kind, amount = transfer.amount, indicator = %indicator, "transfer confirmed");
        Ok(indicator)
    }
}

/// A transaction detail page. The form itself lives at `/transaction/new`
/// and must not count as confirmation.
fn transaction_detail_url() -> UrlCheck {
    UrlCheck::All(vec![
        UrlCheck::Contains("/transaction/".into()),
        UrlCheck::Excludes("/transaction/new".into()),
    ])
}

/// Confirmation indicators for `kind` raced against the form's helper texts
pub fn transfer_outcome_probes<P>(kind: TransferKind) -> ProbeSet<P>
where
    P: PageDriver + ?Sized + 'static,
{
    let probes = match kind {
        TransferKind::Payment => ProbeSet::new()
            .with(text_probe("paid", OutcomeClass::Success, "paid"))
            .with(text_probe("transaction-complete", OutcomeClass::Success, "transaction complete"))
            .with(text_probe("payment-sent", OutcomeClass::Success, "payment sent"))
            .with(visible_probe("success-alert", OutcomeClass::Success, selectors::success_alert()))
            .with(url_probe(
                "transaction-url",
                OutcomeClass::Success,
                transaction_detail_url(),
            )),
        TransferKind::Request => ProbeSet::new()
            .with(text_probe("requested", OutcomeClass::Success, "requested"))
            .with(text_probe("request-sent", OutcomeClass::Success, "request sent"))
            .with(visible_probe("success-alert", OutcomeClass::Success, selectors::success_alert())),
    };

    probes
        .with(visible_probe("amount-error", OutcomeClass::Error, selectors::amount_error()))
        .with(visible_probe("note-error", OutcomeClass::Error, selectors::note_error()))
}
