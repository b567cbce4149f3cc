use anyhow::Result;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wecom_common::types::{AlertState, EvalMatch, EvaluationContext};
use wecom_notify::error::{NotifyError, TransportError};
use wecom_notify::plugin::ChannelRegistry;
use wecom_notify::transport::{ReqwestTransport, WebhookTransport};

/// (content type, body) of every request the fake robot received.
type Received = Arc<Mutex<Vec<(String, String)>>>;

async fn record(State(received): State<Received>, headers: HeaderMap, body: String) -> Json<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    received.lock().unwrap().push((content_type, body));
    Json(json!({"errcode": 0, "errmsg": "ok"}))
}

async fn invalid_key() -> Json<Value> {
    Json(json!({"errcode": 93000, "errmsg": "invalid webhook url"}))
}

async fn upstream_down() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "upstream down")
}

async fn plain_ok() -> &'static str {
    "ok"
}

async fn spawn_robot() -> Result<(String, Received)> {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/send", post(record))
        .route("/invalid-key", post(invalid_key))
        .route("/down", post(upstream_down))
        .route("/plain", post(plain_ok))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), received))
}

#[tokio::test]
async fn posts_json_body_and_accepts_zero_errcode() -> Result<()> {
    let (base, received) = spawn_robot().await?;
    let transport = ReqwestTransport::new();

    transport
        .send_sync(&format!("{base}/send"), r#"{"msgtype":"text"}"#)
        .await?;

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, "application/json");
    assert_eq!(received[0].1, r#"{"msgtype":"text"}"#);
    Ok(())
}

#[tokio::test]
async fn non_zero_errcode_is_an_api_error() -> Result<()> {
    let (base, _) = spawn_robot().await?;
    let transport = ReqwestTransport::new();

    let err = transport
        .send_sync(&format!("{base}/invalid-key"), "{}")
        .await
        .unwrap_err();

    match err {
        TransportError::Api { code, message } => {
            assert_eq!(code, 93000);
            assert_eq!(message, "invalid webhook url");
        }
        other => panic!("expected api error, got {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn http_error_status_is_reported_with_body() -> Result<()> {
    let (base, _) = spawn_robot().await?;
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(5))?;

    let err = transport
        .send_sync(&format!("{base}/down"), "{}")
        .await
        .unwrap_err();

    assert!(
        matches!(err, TransportError::HttpStatus { status: 502, ref body } if body == "upstream down"),
        "unexpected error: {err}"
    );
    Ok(())
}

#[tokio::test]
async fn non_json_success_reply_is_accepted() -> Result<()> {
    let (base, _) = spawn_robot().await?;
    ReqwestTransport::new()
        .send_sync(&format!("{base}/plain"), "{}")
        .await?;
    Ok(())
}

#[tokio::test]
async fn unreachable_webhook_is_a_request_error() -> Result<()> {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let err = ReqwestTransport::new()
        .send_sync(&format!("http://{addr}/send"), "{}")
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Request(_)), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn channel_delivers_text_and_image_end_to_end() -> Result<()> {
    let (base, received) = spawn_robot().await?;
    let registry = ChannelRegistry::default();
    let settings = json!({
        "webhook": format!("{base}/send"),
        "userid": "alice;bob",
        "mobile": "13800000000"
    });
    let channel = registry.create_channel(
        "wecom robot",
        "wecom-e2e",
        &settings,
        Arc::new(ReqwestTransport::new()),
    )?;

    let mut image = tempfile::NamedTempFile::new()?;
    image.write_all(b"rendered panel")?;

    let mut ctx = EvaluationContext::new("API 延迟过高", AlertState::Alerting);
    ctx.rule_message = "p99 latency above 500ms".to_string();
    ctx.eval_matches = vec![EvalMatch::new("api.latency.p99", 812.5)];
    ctx.requires_image = true;
    ctx.image_on_disk_path = Some(image.path().to_path_buf());

    channel.send(&ctx).await?;

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 2);

    let text: Value = serde_json::from_str(&received[0].1)?;
    assert_eq!(text["msgtype"], "text");
    assert_eq!(
        text["text"]["content"],
        "[Alerting] API 延迟过高\n\nMessage:\n  p99 latency above 500ms\n\nMetric:\n  api.latency.p99=812.5"
    );
    assert_eq!(text["text"]["mentioned_list"], json!(["alice", "bob"]));
    assert_eq!(text["text"]["mentioned_mobile_list"], json!(["13800000000"]));

    let image: Value = serde_json::from_str(&received[1].1)?;
    assert_eq!(image["msgtype"], "image");
    assert_eq!(image["image"]["base64"], "cmVuZGVyZWQgcGFuZWw=");
    assert_eq!(image["image"]["md5"], "822719f8cb87de44ea175487993f07d6");
    Ok(())
}

#[tokio::test]
async fn channel_surfaces_api_error_as_delivery_error() -> Result<()> {
    let (base, _) = spawn_robot().await?;
    let registry = ChannelRegistry::default();
    let channel = registry.create_channel(
        "wecom robot",
        "wecom-bad-key",
        &json!({"webhook": format!("{base}/invalid-key")}),
        Arc::new(ReqwestTransport::new()),
    )?;

    let err = channel
        .send(&EvaluationContext::new("disk", AlertState::Ok))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NotifyError::Delivery {
            message: "text",
            source: TransportError::Api { code: 93000, .. }
        }
    ));
    Ok(())
}
