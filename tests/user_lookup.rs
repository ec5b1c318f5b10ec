mod common;

use common::{config, init_logging, mount_token};
use serde_json::json;
use wecom_client::{Error, ValidationError, WeComClient};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn resolves_mobile_to_user_id() {
    init_logging();
    let server = MockServer::start().await;
    mount_token(&server, "T", 7200, 1).await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/user/getuserid"))
        .and(query_param("access_token", "T"))
        .and(body_json(json!({"mobile": "13800000000"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "userid": "zhangsan"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeComClient::new(config(&server)).unwrap();
    assert_eq!(client.get_user_id(" 13800000000 ").await.unwrap(), "zhangsan");
}

#[tokio::test]
async fn non_ok_errmsg_is_api_error() {
    init_logging();
    let server = MockServer::start().await;
    mount_token(&server, "T", 7200, 1).await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/user/getuserid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 46004,
            "errmsg": "user no exist"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeComClient::new(config(&server)).unwrap();
    match client.get_user_id("13800000001").await {
        Err(Error::Api { code, message }) => {
            assert_eq!(code, 46004);
            assert_eq!(message, "user no exist");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn ok_without_userid_is_api_error() {
    init_logging();
    let server = MockServer::start().await;
    mount_token(&server, "T", 7200, 1).await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/user/getuserid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errmsg": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeComClient::new(config(&server)).unwrap();
    assert!(matches!(
        client.get_user_id("13800000002").await,
        Err(Error::Api { .. })
    ));
}

#[tokio::test]
async fn empty_mobile_is_rejected_locally() {
    init_logging();
    let server = MockServer::start().await;
    mount_token(&server, "T", 7200, 0).await;

    let client = WeComClient::new(config(&server)).unwrap();
    assert!(matches!(
        client.get_user_id("   ").await,
        Err(Error::Validation(ValidationError::EmptyMobile))
    ));
}
