//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs are the stored shapes of domain data. Each store adapter maps
//! through them explicitly instead of deserializing into arbitrary types.
//!
//! ### Session Record Version History
//! - **1.0.0**: Initial schema (records without a `version` key read as this)
//! - **1.1.0**: Added `frozenAt`

mod session;
mod versions;

pub use session::{
    SESSION_ENTITY, SESSION_RECORD_VERSION, SessionRecord, SessionRecordV1_0_0,
    SessionRecordV1_1_0, check_restored_session, create_session_migrator, decode_session,
    encode_session,
};
pub use versions::VersionHistoryDocument;
