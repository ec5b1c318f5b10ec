use std::io::Write;

use secrecy::ExposeSecret;
use wecom_client::{Config, ConfigLocation, Error, read_config};

#[tokio::test]
async fn reads_config_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"corp_id":"ww-file","corp_secret":"file-secret","agent_id":7,"base_url":"qy.example.com"}}"#
    )
    .unwrap();

    let cfg = read_config(ConfigLocation::File(
        file.path().to_string_lossy().to_string(),
    ))
    .await
    .unwrap();
    assert_eq!(cfg.corp_id, "ww-file");
    assert_eq!(cfg.corp_secret.expose_secret(), "file-secret");
    assert_eq!(cfg.agent_id, 7);
    assert_eq!(cfg.resolved_base_url().unwrap(), "https://qy.example.com");
}

#[test]
fn malformed_file_is_decode_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"corp_id":"missing the rest"}}"#).unwrap();
    assert!(matches!(Config::from_file(file.path()), Err(Error::Decode(_))));
}

#[test]
fn missing_file_is_io_error() {
    assert!(matches!(
        Config::from_file("/definitely/not/here.json"),
        Err(Error::Io(_))
    ));
}

// Env-driven loading mutates process state, so it lives in a single test.
#[test]
fn reads_config_from_env() {
    unsafe {
        std::env::remove_var("WECOM_CORP_ID");
        std::env::set_var("WECOM_CORP_SECRET", "env-secret");
        std::env::set_var("WECOM_AGENT_ID", "1000003");
        std::env::remove_var("WECOM_BASE_URL");
        std::env::remove_var("WECOM_TIMEOUT_SECS");
    }
    match Config::from_env() {
        Err(Error::Config(msg)) => assert!(msg.contains("WECOM_CORP_ID")),
        other => panic!("expected missing var error, got {:?}", other),
    }

    unsafe {
        std::env::set_var("WECOM_CORP_ID", "ww-env");
        std::env::set_var("WECOM_TIMEOUT_SECS", "9");
    }
    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.corp_id, "ww-env");
    assert_eq!(cfg.corp_secret.expose_secret(), "env-secret");
    assert_eq!(cfg.agent_id, 1000003);
    assert_eq!(cfg.timeout_secs, Some(9));
    assert!(cfg.base_url.is_none());

    unsafe {
        std::env::set_var("WECOM_AGENT_ID", "not-a-number");
    }
    match Config::from_env() {
        Err(Error::Config(msg)) => assert!(msg.contains("WECOM_AGENT_ID")),
        other => panic!("expected parse error, got {:?}", other),
    }
}
