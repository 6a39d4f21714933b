pub mod resolve;
pub mod session;
mod utils;
