use std::sync::Arc;

use reqwest::Client;

use crate::token::{Credential, TokenCache};

mod impls;

/// Application client for the messaging platform.
///
/// Clones share one HTTP connection pool and one token cache, so a single
/// credential set refreshes at most once per token lifetime however many
/// clones are sending.
#[derive(Clone, Debug)]
pub struct WeComClient {
    http: Client,
    base_url: String,
    credential: Credential,
    agent_id: i64,
    cache: Arc<TokenCache>,
}
