//! Usage page, schema setup and server-level behavior.

use serde_json::json;

use super::{get, post, raw_request, start, start_with_schema};

#[tokio::test]
async fn home_lists_routes() {
    let server = start().await;
    let reply = get(server.addr(), "/").await;
    server.shutdown().await.unwrap();

    assert_eq!(reply.status, 200);
    assert!(reply.header("content-type").unwrap().starts_with("text/html"));
    assert!(reply.body.contains("/dados"));
    assert!(reply.body.contains("/cidade/{id}"));
}

#[tokio::test]
async fn storage_errors_surface_before_initdb() {
    let server = start_with_schema(false).await;
    let addr = server.addr();

    let before = get(addr, "/dados").await;
    let init = get(addr, "/initdb").await;
    let after = get(addr, "/dados").await;
    server.shutdown().await.unwrap();

    assert_eq!(before.status, 500);
    let message = before.json()["error"].as_str().unwrap().to_string();
    assert!(message.starts_with("Database error"), "{message}");
    assert!(message.contains("no such table"), "{message}");

    assert_eq!(init.status, 200);
    assert_eq!(init.json()["message"], "Banco de dados inicializado");
    assert_eq!(after.status, 200);
    assert_eq!(after.json(), json!([]));
}

#[tokio::test]
async fn initdb_is_idempotent() {
    let server = start().await;
    let addr = server.addr();

    let id = post(addr, "/dados", json!({ "nome": "Ana", "idade": 30 }))
        .await
        .json()["id"]
        .as_i64()
        .unwrap();
    let init = get(addr, "/initdb").await;
    let one = get(addr, &format!("/dados/{id}")).await;
    server.shutdown().await.unwrap();

    assert_eq!(init.status, 200);
    assert_eq!(one.status, 200, "existing rows survive a second /initdb");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = start().await;
    let addr = server.addr();

    let reply = raw_request(
        addr,
        b"POST /dados HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 10485760\r\nConnection: close\r\n\r\n",
    )
    .await;
    server.shutdown().await.unwrap();

    assert_eq!(reply.status, 413);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let server = start().await;
    let reply = get(server.addr(), "/dados").await;
    server.shutdown().await.unwrap();

    assert_eq!(reply.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(reply.header("x-frame-options"), Some("DENY"));
}

#[tokio::test]
async fn keeps_serving_after_clients_hang_up() {
    let server = start().await;
    let addr = server.addr();

    for _ in 0..10 {
        let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        drop(stream);
    }
    let reply = get(addr, "/dados").await;
    server.shutdown().await.unwrap();

    assert_eq!(reply.status, 200);
    assert_eq!(reply.json(), json!([]));
}
