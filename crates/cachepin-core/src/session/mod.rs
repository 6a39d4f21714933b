//! Session domain module.
//!
//! This module contains the session entity, its customer-status state
//! machine, the freeze algorithm and the repository interface.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `customer`: Customer status state machine (`CustomerStatus`)
//! - `order`: Active order and OTP types
//! - `metadata`: Device info and terms approval
//! - `snapshot`: Freezing resolved versions onto a session
//! - `repository`: Repository trait for session persistence

mod customer;
mod metadata;
mod model;
mod order;
mod repository;
mod snapshot;

// Re-export public API
pub use customer::CustomerStatus;
pub use metadata::{DeviceInfo, TermsApproval};
pub use model::Session;
pub use order::{ActiveOrder, OrderDetails, Otp};
pub use repository::SessionRepository;
pub use snapshot::{freeze_versions, snapshot_versions};
