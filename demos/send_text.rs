use wecom_client::{Config, WeComClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional: enable basic logging for the example
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Reads WECOM_CORP_ID, WECOM_CORP_SECRET and WECOM_AGENT_ID
    let cfg = Config::from_env()?;
    let client = WeComClient::new(cfg)?;

    let recipient = std::env::args().nth(1).unwrap_or_else(|| "@all".to_string());
    let resp = client
        .send_text("deployment finished", [recipient.as_str()])
        .await?;
    if resp.has_undelivered() {
        eprintln!("not delivered to: {}", resp.invaliduser);
    }
    println!("msgid={}", resp.msgid);
    Ok(())
}
