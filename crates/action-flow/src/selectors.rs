//! Selector specs for the payment application under test

use action_locator::{SelectionStrategy as S, SelectorSpec};

// Login form

pub fn username_input() -> SelectorSpec {
    S::css("input#username").into()
}

pub fn password_input() -> SelectorSpec {
    S::css("input#password").into()
}

pub fn signin_submit() -> SelectorSpec {
    SelectorSpec::new(S::test_id("signin-submit")).or(S::text("Sign In"))
}

pub fn signin_heading() -> SelectorSpec {
    S::role("heading", "sign in").into()
}

pub fn remember_me() -> SelectorSpec {
    SelectorSpec::new(S::test_id("signin-remember-me")).or(S::css("input[name=\"remember\"]"))
}

pub fn signin_error() -> SelectorSpec {
    SelectorSpec::new(S::css("[data-test*=\"signin-error\"], [data-testid*=\"signin-error\"]"))
        .or(S::css(".error-message"))
        .or(S::css("[role=\"alert\"]"))
}

/// Indicators that a session is open, as `(label, spec)`
pub fn signed_in_indicators() -> Vec<(&'static str, SelectorSpec)> {
    vec![
        ("sidenav-user-full-name", S::test_id("sidenav-user-full-name").into()),
        ("sidenav-username", S::test_id("sidenav-username").into()),
        ("navdrawer-avatar", S::css(".NavDrawer-avatar img").into()),
        ("sidenav-home", S::test_id("sidenav-home").into()),
        ("nav-home", SelectorSpec::new(S::test_id("nav-home")).or(S::css("#nav-home"))),
    ]
}

pub fn home_link() -> SelectorSpec {
    SelectorSpec::new(S::test_id("nav-home"))
        .or(S::css("#nav-home"))
        .or(S::text("Home"))
}

pub fn sign_out() -> SelectorSpec {
    SelectorSpec::new(S::test_id("sidenav-signout"))
        .or(S::test_id("nav-signout"))
        .or(S::role("button", "sign out"))
        .or(S::role("button", "logout"))
        .or(S::text("sign out"))
        .or(S::text("logout"))
}

// Navigation

pub fn sidenav_home() -> SelectorSpec {
    S::test_id("sidenav-home").into()
}

pub fn contacts_tab() -> SelectorSpec {
    SelectorSpec::new(S::test_id("nav-contacts-tab"))
        .or(S::test_id("nav-contacts"))
        .or(S::css("[aria-label=\"Contacts\"]"))
        .or(S::role("button", "Contacts"))
}

pub fn contacts_heading() -> SelectorSpec {
    S::text("contacts").into()
}

pub fn personal_tab() -> SelectorSpec {
    S::test_id("nav-personal-tab").into()
}

pub fn public_tab() -> SelectorSpec {
    S::test_id("nav-public-tab").into()
}

pub fn new_transaction() -> SelectorSpec {
    S::test_id("nav-top-new-transaction").into()
}

// Transaction form

pub fn first_user_item() -> SelectorSpec {
    S::css("[data-test=\"users-list\"] [data-test^=\"user-list-item-\"]").into()
}

pub fn amount_input() -> SelectorSpec {
    S::css("#amount").into()
}

pub fn note_input() -> SelectorSpec {
    S::css("#transaction-create-description-input").into()
}

pub fn pay_submit() -> SelectorSpec {
    S::test_id("transaction-create-submit-payment").into()
}

pub fn request_submit() -> SelectorSpec {
    SelectorSpec::new(S::test_id("transaction-create-submit-request")).or(S::exact_text("Request"))
}

pub fn amount_error() -> SelectorSpec {
    S::css("#transaction-create-amount-input-helper-text").into()
}

pub fn note_error() -> SelectorSpec {
    S::css("#transaction-create-description-input-helper-text").into()
}

pub fn success_alert() -> SelectorSpec {
    SelectorSpec::new(S::css("[data-test*=\"alert\"]"))
        .or(S::css(".success-message"))
        .or(S::css("[role=\"alert\"]"))
}

// Feed and contacts

pub fn transaction_list() -> SelectorSpec {
    S::test_id("transaction-list").into()
}

/// Every listed transaction; flows act on the first match
pub fn transaction_items() -> SelectorSpec {
    S::css("[data-test=\"transaction-list\"] [data-test^=\"transaction-item-\"]").into()
}

pub fn first_transaction_item() -> SelectorSpec {
    transaction_items()
}

pub fn load_more() -> SelectorSpec {
    SelectorSpec::new(S::text("Load more")).or(S::role("button", "load more"))
}

pub fn empty_feed() -> SelectorSpec {
    S::text("no transactions").into()
}

pub fn user_profile() -> SelectorSpec {
    S::test_id("user-profile").into()
}

pub fn contact_info() -> SelectorSpec {
    S::test_id("contact-info").into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_locator::StrategySlot;

    #[test]
    fn contacts_tab_falls_back_in_documented_order() {
        let spec = contacts_tab();

        assert_eq!(spec.len(), 4);
        assert_eq!(spec.get(StrategySlot::Fallback(1)), Some(&S::css("[aria-label=\"Contacts\"]")));
        assert_eq!(spec.get(StrategySlot::Fallback(2)), Some(&S::role("button", "Contacts")));
    }

    #[test]
    fn every_signed_in_indicator_has_a_distinct_label() {
        let indicators = signed_in_indicators();
        let mut labels: Vec<_> = indicators.iter().map(|(label, _)| *label).collect();
        labels.sort_unstable();
        labels.dedup();

        assert_eq!(labels.len(), indicators.len());
    }
}
