//! Customer identity status.

use serde::{Deserialize, Serialize};

/// Identification state of the customer behind a session.
///
/// ```text
/// NoCustomer --(id, is_new)--> NewCustomer --(id, !is_new)--> ExistingCustomer
///      ^                                                            |
///      +--------------------------(empty id)------------------------+
/// ```
///
/// An empty id resets to `NoCustomer` from any state. Going from
/// `ExistingCustomer` back to `NewCustomer` is an explicit re-identification
/// and is allowed like any other assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomerStatus {
    #[default]
    NoCustomer,
    NewCustomer,
    ExistingCustomer,
}

impl CustomerStatus {
    /// Status that results from assigning `customer_id` with the given `is_new` flag.
    pub fn for_assignment(customer_id: &str, is_new: bool) -> Self {
        if customer_id.is_empty() {
            CustomerStatus::NoCustomer
        } else if is_new {
            CustomerStatus::NewCustomer
        } else {
            CustomerStatus::ExistingCustomer
        }
    }

    /// Returns true if the status agrees with `customer_id` being empty or not.
    pub fn is_consistent_with(self, customer_id: &str) -> bool {
        (self == CustomerStatus::NoCustomer) == customer_id.is_empty()
    }
}
