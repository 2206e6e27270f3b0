use molt_source::chat::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn relay_for(base_url: String) -> ChatRelay {
    ChatRelay::new(ChatConfig { base_url, timeout_secs: 5 }).unwrap()
}

#[tokio::test]
async fn test_send_returns_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "hola"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "¡Hola!", "reply": "¡Hola!", "sources": []
        })))
        .mount(&server)
        .await;

    let reply = relay_for(server.uri()).send("  hola ").await;
    assert_eq!(reply.as_deref(), Some("¡Hola!"));
}

#[tokio::test]
async fn test_missing_reply_uses_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Error interno"})))
        .mount(&server)
        .await;

    let reply = relay_for(server.uri()).send("hola").await;
    assert_eq!(reply.as_deref(), Some(NO_REPLY_MESSAGE));
}

#[tokio::test]
async fn test_unreachable_relay_gives_connection_message() {
    let relay = relay_for("http://127.0.0.1:9".to_string());
    let reply = relay.send("hola").await.unwrap();
    assert!(reply.starts_with("Error de conexión"));
    assert!(reply.ends_with("http://127.0.0.1:9"));
}

#[tokio::test]
async fn test_blank_input_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    assert!(relay_for(server.uri()).send("   ").await.is_none());
}

#[tokio::test]
async fn test_session_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "42"})))
        .mount(&server)
        .await;

    let mut session = ChatSession::new(relay_for(server.uri()));
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].content, GREETING);

    let answer = session.ask("¿Cuántos agentes?").await.unwrap().clone();
    assert_eq!(answer.role, ChatRole::Assistant);
    assert_eq!(answer.content, "42");
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.messages()[1].role, ChatRole::User);

    assert!(session.ask("").await.is_none());
    assert_eq!(session.messages().len(), 3);
}
