use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use super::handler::release_connection;
use crate::config::Config;
use crate::db::MemoryCodeBlocks;
use crate::models::{Role, SendMessage};
use crate::routes::create_app;
use crate::services::CodeBlockService;
use crate::state::AppState;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn app_state() -> AppState {
    let service = CodeBlockService::new(Arc::new(MemoryCodeBlocks::new()), Duration::from_secs(60));
    AppState::new(service)
}

async fn start_server() -> (String, AppState) {
    let state = app_state();
    let app = create_app(state.clone(), &Config::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("ws://{}/ws", addr), state)
}

async fn connect(url: &str) -> Client {
    let (client, _) = connect_async(url).await.unwrap();
    client
}

async fn send(client: &mut Client, msg: Value) {
    client.send(Message::Text(msg.to_string().into())).await.unwrap();
}

/// Read frames until one of the given type arrives
async fn expect(client: &mut Client, msg_type: &str) -> Value {
    let wait = async {
        loop {
            let frame = client.next().await.expect("socket closed").unwrap();
            if !frame.is_text() {
                continue;
            }
            let value: Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
            if value["type"] == msg_type {
                return value;
            }
        }
    };
    timeout(Duration::from_secs(5), wait)
        .await
        .unwrap_or_else(|_| panic!("no '{}' message within 5s", msg_type))
}

#[tokio::test]
async fn test_mentor_and_student_session() {
    let (url, state) = start_server().await;

    let mut mentor = connect(&url).await;
    send(&mut mentor, json!({ "type": "join", "roomId": "block-1" })).await;
    assert_eq!(expect(&mut mentor, "roleAssigned").await["role"], "Mentor");
    assert_eq!(expect(&mut mentor, "participantCount").await["count"], 0);

    let mut student = connect(&url).await;
    send(&mut student, json!({ "type": "join", "roomId": "block-1" })).await;
    assert_eq!(expect(&mut student, "roleAssigned").await["role"], "Student");
    assert_eq!(expect(&mut student, "participantCount").await["count"], 1);
    assert_eq!(expect(&mut mentor, "participantCount").await["count"], 1);

    send(
        &mut student,
        json!({ "type": "edit", "roomId": "block-1", "content": "function f() { return 1; }" }),
    )
    .await;
    let changed = expect(&mut mentor, "documentChanged").await;
    assert_eq!(changed["content"], "function f() { return 1; }");

    // A late joiner is synced to the current buffer
    let mut late = connect(&url).await;
    send(&mut late, json!({ "type": "join", "roomId": "block-1" })).await;
    assert_eq!(expect(&mut late, "roleAssigned").await["role"], "Student");
    assert_eq!(expect(&mut late, "documentSync").await["content"], "function f() { return 1; }");

    // The mentor going away closes the room for everyone
    mentor.close(None).await.unwrap();
    expect(&mut student, "ownerLeft").await;
    expect(&mut late, "ownerLeft").await;

    timeout(Duration::from_secs(5), async {
        while state.sessions.has_room("block-1") {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("room still open after the mentor left");
}

#[tokio::test]
async fn test_ping_and_malformed_frames() {
    let (url, _state) = start_server().await;
    let mut client = connect(&url).await;

    send(&mut client, json!({ "type": "unknown" })).await;
    client.send(Message::Text("not json".into())).await.unwrap();
    send(&mut client, json!({ "type": "ping" })).await;

    let pong = expect(&mut client, "pong").await;
    assert!(pong["date"].is_string());
}

#[tokio::test]
async fn test_closed_owner_socket_always_reaches_the_room() {
    let state = app_state();
    let owner_rx = state.connections.register("owner");
    let mut student_rx = state.connections.register("student");
    assert_eq!(state.sessions.join("owner", "block-1"), Role::Owner);
    assert_eq!(state.sessions.join("student", "block-1"), Role::Participant);
    while student_rx.try_recv().is_ok() {}

    // The owner's writer task is gone, cleanup has not run yet
    drop(owner_rx);
    state.sessions.sweep();
    let _late_rx = state.connections.register("late");
    assert_eq!(state.sessions.join("late", "block-1"), Role::Participant);
    while student_rx.try_recv().is_ok() {}

    release_connection(&state, "owner");
    assert_eq!(student_rx.try_recv().unwrap(), SendMessage::OwnerLeft);
    assert!(!state.sessions.has_room("block-1"));
    assert_eq!(state.connections.count(), 2);
}

#[tokio::test]
async fn test_join_right_after_mentor_closes() {
    let (url, _state) = start_server().await;

    let mut mentor = connect(&url).await;
    send(&mut mentor, json!({ "type": "join", "roomId": "block-2" })).await;
    assert_eq!(expect(&mut mentor, "roleAssigned").await["role"], "Mentor");

    let mut student = connect(&url).await;
    send(&mut student, json!({ "type": "join", "roomId": "block-2" })).await;
    assert_eq!(expect(&mut student, "roleAssigned").await["role"], "Student");

    let mut late = connect(&url).await;
    mentor.close(None).await.unwrap();
    send(&mut late, json!({ "type": "join", "roomId": "block-2" })).await;

    // However the join and the close interleave, the student hears the mentor left
    expect(&mut student, "ownerLeft").await;
}
