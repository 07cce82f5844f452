//! End-to-end test against a loopback WebSocket server.

use futures::{SinkExt, StreamExt};
use neuro_sdk::{
    ActionDefinition, ActionResult, ActionsForce, Message, NeuroError, Session, SessionConfig,
};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Accept one client, record the frames it sends and answer a force with an action.
async fn fake_agent(listener: TcpListener) -> Vec<String> {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = accept_async(stream).await.unwrap();
    let mut frames = Vec::new();

    while let Some(Ok(msg)) = ws.next().await {
        let WsMessage::Text(text) = msg else { continue };
        let text = text.as_str().to_string();
        let value: Value = serde_json::from_str(&text).unwrap();
        let command = value["command"].as_str().unwrap_or_default().to_string();
        frames.push(text);

        match command.as_str() {
            "actions/force" => {
                let reply = r#"{"command":"action","data":{"id":"abc","name":"move","data":"{\"cell\":4}"}}"#;
                ws.send(WsMessage::Text(reply.to_string().into()))
                    .await
                    .unwrap();
            }
            "action:result" => {
                ws.close(None).await.unwrap();
                break;
            }
            _ => {}
        }
    }
    frames
}

#[tokio::test]
async fn test_round_trip_over_websocket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let agent = tokio::spawn(fake_agent(listener));

    let config = SessionConfig::new("TicTacToe")
        .with_url(url)
        .with_poll_interval(Duration::from_millis(20));
    let mut session = timeout(TIMEOUT, Session::create(config))
        .await
        .unwrap()
        .map_err(|e| e.to_string())
        .unwrap();
    assert!(session.connected());

    session.send(&Message::Startup).unwrap();
    session
        .send(&Message::ActionsRegister(vec![
            ActionDefinition::new("move")
                .with_description("Pick a cell")
                .with_schema(r#"{"type":"integer","minimum":0,"maximum":8}"#),
        ]))
        .unwrap();
    session
        .send(&Message::ActionsForce(ActionsForce::new("Your move", ["move"])))
        .unwrap();

    let request = timeout(TIMEOUT, async {
        loop {
            let batch = session.poll().await;
            assert_eq!(batch.error, None);
            if let Some(action) = batch.into_iter().find_map(Message::into_action) {
                return action;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(request.id, "abc");
    assert_eq!(request.name, "move");
    assert_eq!(request.data.as_deref(), Some(r#"{"cell":4}"#));

    session
        .send(&Message::ActionResult(
            ActionResult::success(request.id).with_message("Move accepted."),
        ))
        .unwrap();

    // The agent closes after the result; polling observes the close.
    let outcome = timeout(TIMEOUT, async {
        loop {
            let batch = session.poll().await;
            if batch.error.is_some() {
                return batch.error;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(outcome, Some(NeuroError::ConnectionError));
    assert!(!session.connected());
    session.destroy().await.unwrap();

    let frames = agent.await.unwrap();
    assert_eq!(
        frames,
        vec![
            r#"{"command":"startup","game":"TicTacToe"}"#.to_string(),
            r#"{"command":"actions/register","game":"TicTacToe","data":{"actions":[{"name":"move","description":"Pick a cell","schema":{"type":"integer","minimum":0,"maximum":8}}]}}"#.to_string(),
            r#"{"command":"actions/force","game":"TicTacToe","data":{"state":null,"query":"Your move","ephemeral_context":null,"action_names":["move"],"priority":"low"}}"#.to_string(),
            r#"{"command":"action:result","game":"TicTacToe","data":{"id":"abc","success":true,"message":"Move accepted."}}"#.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_create_fails_when_nobody_listens() {
    // Reserve a port, then free it so the connection is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = SessionConfig::new("Bot")
        .with_url(url)
        .with_connect_policy(2, Duration::from_millis(50));
    let result = Session::create(config).await;
    assert_eq!(result.err(), Some(NeuroError::ConnectionError));
}
