#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use serde_json::json;
use wecom_client::Config;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CORP_ID: &str = "ww-integration";
pub const CORP_SECRET: &str = "integration-secret";
pub const AGENT_ID: i64 = 1000002;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn config(server: &MockServer) -> Config {
    Config::from_values(CORP_ID, CORP_SECRET, AGENT_ID, Some(server.uri()), Some(5))
}

pub fn token_body(token: &str, expires_in: u64) -> serde_json::Value {
    json!({
        "errcode": 0,
        "errmsg": "ok",
        "access_token": token,
        "expires_in": expires_in
    })
}

/// gettoken endpoint handing out `token`, verified to be hit exactly `times` times.
pub async fn mount_token(server: &MockServer, token: &str, expires_in: u64, times: u64) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .and(query_param("corpid", CORP_ID))
        .and(query_param("corpsecret", CORP_SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(token, expires_in)))
        .expect(times)
        .mount(server)
        .await;
}

/// Same as `mount_token` but answers slowly, widening the window for concurrent callers.
pub async fn mount_slow_token(server: &MockServer, token: &str, delay: Duration, times: u64) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body(token, 7200))
                .set_delay(delay),
        )
        .expect(times)
        .mount(server)
        .await;
}
