use crate::tests::test_support::{base_config, capture_logs, drain_logs, mount_token};
use crate::WeComClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn partial_delivery_is_success_with_warning() {
    let server = MockServer::start().await;
    mount_token(&server, "T", 7200, 1).await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/message/send"))
        .and(query_param("access_token", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 0,
            "errmsg": "ok",
            "invaliduser": "ghost",
            "msgid": "msg-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeComClient::new(base_config(&server.uri())).unwrap();
    let (lines, guard) = capture_logs();
    let resp = client
        .send_text("hello", ["alice", "ghost"])
        .await
        .expect("partial delivery is not an error");
    drop(guard);

    assert_eq!(resp.invaliduser, "ghost");
    assert_eq!(resp.msgid, "msg-1");
    assert!(resp.has_undelivered());

    let logs = drain_logs(lines);
    assert!(
        logs.iter()
            .any(|l| l.contains("WARN") && l.contains("invaliduser='ghost'")),
        "expected partial delivery warning, got: {:?}",
        logs
    );
}
