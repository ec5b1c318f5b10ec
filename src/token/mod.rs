mod cache;
mod envelope;

pub use cache::TokenCache;
pub use envelope::{CachedToken, Credential, IssuedToken, TokenSnapshot};
