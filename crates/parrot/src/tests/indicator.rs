use crate::LogIndicator;

use parrot_core::StatusLine;

/// WHAT: The indicator starts dark and follows the driven level
/// WHY: The status line must mirror session activity exactly
#[test]
fn given_new_indicator_when_driven_then_level_follows() {
    let mut indicator = LogIndicator::new();
    assert!(!indicator.is_active());

    indicator.set_active(true);
    assert!(indicator.is_active());

    indicator.set_active(false);
    assert!(!indicator.is_active());
}

/// WHAT: Re-asserting the current level is harmless
/// WHY: The panel drives the line per session without tracking its state
#[test]
fn given_active_indicator_when_reasserted_then_still_active() {
    let mut indicator = LogIndicator::new();

    indicator.set_active(true);
    indicator.set_active(true);
    assert!(indicator.is_active());

    indicator.set_active(false);
    indicator.set_active(false);
    assert!(!indicator.is_active());
}
