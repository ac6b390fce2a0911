//! Permission grants and public share links.

mod service;
mod token;

pub use service::{CreateGrantRequest, ShareService};
pub use token::generate_token;
