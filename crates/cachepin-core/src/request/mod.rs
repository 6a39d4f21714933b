//! Request-scoped plumbing: token data extraction and the context handle.

mod context;
mod token;

pub use context::{DATA_NOW_KEY, DATA_VERSIONS_KEY, RequestContext, TOKEN_DATA_KEY};
pub use token::TokenData;
