//! Approval decisions - pure functions
//!
//! No I/O happens here; the gateway hands in the reviews it fetched.

use crate::types::{ReviewRecord, ReviewState};

/// Whether the latest decision `login` made in `reviews` is an approval.
///
/// `reviews` must be in submission order. Only approving, change-requesting
/// and dismissed reviews count as decisions; a later comment-only review
/// leaves an approval in place.
pub fn latest_decision_is_approval(reviews: &[ReviewRecord], login: &str) -> bool {
    reviews
        .iter()
        .rev()
        .filter(|r| r.login == login)
        .find(|r| r.state.is_decision())
        .is_some_and(|r| r.state == ReviewState::Approved)
}
