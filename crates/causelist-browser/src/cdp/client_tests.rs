use super::*;

fn pending_with(id: u64) -> (PendingMap, oneshot::Receiver<Result<Value, CdpError>>) {
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (tx, rx) = oneshot::channel();
    pending.lock().insert(id, PendingRequest { tx });
    (pending, rx)
}

/// Loopback websocket that answers every command with the id, method and
/// session it arrived with.
async fn echo_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            let request: Value = serde_json::from_str(&text).unwrap();
            let reply = json!({
                "id": request["id"],
                "result": {
                    "echoId": request["id"],
                    "method": request["method"],
                    "sessionId": request["sessionId"],
                }
            });
            ws.send(Message::Text(reply.to_string().into())).await.unwrap();
        }
    });
    format!("ws://{}", addr)
}

#[tokio::test]
async fn test_transport_request_ids_and_sessions() {
    let url = echo_server().await;
    let (ws, _) = tokio_tungstenite::connect_async(&url).await.unwrap();
    let (transport, recv_task) = Transport::start(ws, Duration::from_secs(5));

    let first = transport.call("Browser.getVersion", None, None).await.unwrap();
    assert_eq!(first["echoId"], 1);
    assert_eq!(first["method"], "Browser.getVersion");
    assert_eq!(first["sessionId"], Value::Null);

    // Page sessions share the counter through cloned transports.
    let page = transport.clone();
    let second = page
        .call("Runtime.evaluate", Some(json!({"expression": "1"})), Some("S1"))
        .await
        .unwrap();
    assert_eq!(second["echoId"], 2);
    assert_eq!(second["sessionId"], "S1");

    let third = transport.call("Target.getTargets", None, None).await.unwrap();
    assert_eq!(third["echoId"], 3);
    assert!(transport.pending.lock().is_empty());

    recv_task.abort();
}

#[tokio::test]
async fn test_dispatch_result_to_pending() {
    let (pending, rx) = pending_with(5);
    let resp: CdpResponse =
        serde_json::from_str(r#"{"id": 5, "result": {"frameId": "MAIN"}}"#).unwrap();

    CdpClient::dispatch(resp, &pending);

    let value = rx.await.unwrap().unwrap();
    assert_eq!(value["frameId"], "MAIN");
    assert!(pending.lock().is_empty());
}

#[tokio::test]
async fn test_dispatch_error_to_pending() {
    let (pending, rx) = pending_with(9);
    let resp: CdpResponse = serde_json::from_str(
        r#"{"id": 9, "error": {"code": -32000, "message": "Cannot find context with specified id"}}"#,
    )
    .unwrap();

    CdpClient::dispatch(resp, &pending);

    let err = rx.await.unwrap().unwrap_err();
    assert!(matches!(err, CdpError::Protocol { code: -32000, .. }));
    assert!(err.is_context_lost());
}

#[tokio::test]
async fn test_dispatch_missing_result_is_null() {
    let (pending, rx) = pending_with(2);
    let resp: CdpResponse = serde_json::from_str(r#"{"id": 2}"#).unwrap();

    CdpClient::dispatch(resp, &pending);

    assert_eq!(rx.await.unwrap().unwrap(), Value::Null);
}

#[test]
fn test_dispatch_event_leaves_pending_untouched() {
    let (pending, _rx) = pending_with(1);
    let resp: CdpResponse =
        serde_json::from_str(r#"{"method": "Page.frameNavigated", "params": {}}"#).unwrap();

    CdpClient::dispatch(resp, &pending);

    assert_eq!(pending.lock().len(), 1);
}

#[test]
fn test_dispatch_unknown_id_is_ignored() {
    let (pending, _rx) = pending_with(1);
    let resp: CdpResponse = serde_json::from_str(r#"{"id": 99, "result": {}}"#).unwrap();

    CdpClient::dispatch(resp, &pending);

    assert_eq!(pending.lock().len(), 1);
}

#[tokio::test]
async fn test_connect_unreachable_endpoint() {
    let result = CdpClient::connect("http://127.0.0.1:1", Duration::from_secs(1)).await;
    assert!(matches!(result, Err(CdpError::ChromeNotAvailable(_))));
}
