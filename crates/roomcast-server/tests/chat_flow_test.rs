//! End-to-end chat flow tests.
//!
//! Each test binds a real server on an ephemeral port, connects WebSocket
//! clients, and asserts the event sequences the protocol promises: welcome
//! before join notice, roster last, room-scoped fan-out, ack after sends.

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use roomcast_proto::ServerEvent;
use roomcast_server::{Server, ServerRuntimeConfig};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> SocketAddr {
    let config = ServerRuntimeConfig { port: 0, public_dir: "../../public".into() };
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    client
}

async fn send(client: &mut Client, frame: &str) {
    client.send(Message::text(frame.to_owned())).await.unwrap();
}

/// Next JSON event from the server, skipping transport-level frames.
async fn recv_event(client: &mut Client) -> ServerEvent {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for a server event")
            .expect("connection closed while waiting for a server event")
            .unwrap();

        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Joins a room and consumes the three events a successful join delivers to
/// the joining client (welcome, roster, ack).
async fn join(client: &mut Client, username: &str, room: &str) {
    send(
        client,
        &format!(r#"{{"type":"join","username":"{username}","room":"{room}"}}"#),
    )
    .await;

    match recv_event(client).await {
        ServerEvent::Message(message) => {
            assert_eq!(message.username, "Admin");
            assert_eq!(message.text, "Welcome!");
        },
        other => panic!("expected the Admin welcome first, got {other:?}"),
    }
    match recv_event(client).await {
        ServerEvent::RoomData(snapshot) => assert_eq!(snapshot.room, room),
        other => panic!("expected the roster after the welcome, got {other:?}"),
    }
    match recv_event(client).await {
        ServerEvent::Ack { error: None } => {},
        other => panic!("expected a clean ack last, got {other:?}"),
    }
}

#[tokio::test]
async fn join_notifies_existing_members_and_updates_roster() {
    let addr = start_server().await;

    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "lobby").await;

    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "lobby").await;

    // Alice sees the join notice, then the updated roster.
    match recv_event(&mut alice).await {
        ServerEvent::Message(message) => {
            assert_eq!(message.username, "Admin");
            assert_eq!(message.text, "bob has joined!");
        },
        other => panic!("expected the join notice, got {other:?}"),
    }
    match recv_event(&mut alice).await {
        ServerEvent::RoomData(snapshot) => {
            let names: Vec<&str> =
                snapshot.users.iter().map(|user| user.username.as_str()).collect();
            assert_eq!(names, vec!["alice", "bob"]);
        },
        other => panic!("expected the updated roster, got {other:?}"),
    }
}

#[tokio::test]
async fn message_reaches_the_whole_room_including_sender() {
    let addr = start_server().await;

    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "lobby").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "lobby").await;

    // Drain bob's join from alice's stream.
    recv_event(&mut alice).await;
    recv_event(&mut alice).await;

    send(&mut alice, r#"{"type":"sendMessage","text":"hi"}"#).await;

    for client in [&mut alice, &mut bob] {
        match recv_event(client).await {
            ServerEvent::Message(message) => {
                assert_eq!(message.username, "alice");
                assert_eq!(message.text, "hi");
            },
            other => panic!("expected the chat message, got {other:?}"),
        }
    }

    // The sender's ack arrives after its own copy of the broadcast.
    match recv_event(&mut alice).await {
        ServerEvent::Ack { error: None } => {},
        other => panic!("expected the ack after the broadcast, got {other:?}"),
    }
}

#[tokio::test]
async fn messages_do_not_cross_room_boundaries() {
    let addr = start_server().await;

    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "general").await;
    let mut carol = connect(addr).await;
    join(&mut carol, "carol", "random").await;

    send(&mut alice, r#"{"type":"sendMessage","text":"general only"}"#).await;
    recv_event(&mut alice).await; // her own copy
    recv_event(&mut alice).await; // ack

    // Carol must not receive it; the next thing she sees is her own echo.
    send(&mut carol, r#"{"type":"sendMessage","text":"random only"}"#).await;
    match recv_event(&mut carol).await {
        ServerEvent::Message(message) => {
            assert_eq!(message.username, "carol");
            assert_eq!(message.text, "random only");
        },
        other => panic!("expected carol's own message, got {other:?}"),
    }
}

#[tokio::test]
async fn location_broadcasts_a_map_link() {
    let addr = start_server().await;

    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "lobby").await;

    send(&mut alice, r#"{"type":"sendLocation","latitude":51.5,"longitude":-0.12}"#).await;

    match recv_event(&mut alice).await {
        ServerEvent::LocationMessage(location) => {
            assert_eq!(location.username, "alice");
            assert_eq!(location.url, "https://google.com/maps?q=51.5,-0.12");
        },
        other => panic!("expected the location message, got {other:?}"),
    }
    match recv_event(&mut alice).await {
        ServerEvent::Ack { error: None } => {},
        other => panic!("expected the ack after the broadcast, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_username_join_is_rejected_with_an_ack_error() {
    let addr = start_server().await;

    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "lobby").await;

    let mut imposter = connect(addr).await;
    send(&mut imposter, r#"{"type":"join","username":"alice","room":"lobby"}"#).await;

    match recv_event(&mut imposter).await {
        ServerEvent::Ack { error: Some(error) } => {
            assert_eq!(error, "That username is in use!");
        },
        other => panic!("expected a rejection ack, got {other:?}"),
    }
}

#[tokio::test]
async fn message_before_join_is_rejected_with_an_ack_error() {
    let addr = start_server().await;

    let mut client = connect(addr).await;
    send(&mut client, r#"{"type":"sendMessage","text":"hello?"}"#).await;

    match recv_event(&mut client).await {
        ServerEvent::Ack { error: Some(error) } => {
            assert_eq!(error, "No user found for this connection");
        },
        other => panic!("expected a rejection ack, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_frame_gets_an_ack_error_and_keeps_the_connection() {
    let addr = start_server().await;

    let mut client = connect(addr).await;
    send(&mut client, "not json").await;

    match recv_event(&mut client).await {
        ServerEvent::Ack { error: Some(_) } => {},
        other => panic!("expected a rejection ack, got {other:?}"),
    }

    // The connection survives and can still join.
    join(&mut client, "alice", "lobby").await;
}

#[tokio::test]
async fn disconnect_notifies_the_remaining_members() {
    let addr = start_server().await;

    let mut alice = connect(addr).await;
    join(&mut alice, "alice", "lobby").await;
    let mut bob = connect(addr).await;
    join(&mut bob, "bob", "lobby").await;

    recv_event(&mut alice).await; // bob's join notice
    recv_event(&mut alice).await; // roster with bob

    bob.close(None).await.unwrap();

    match recv_event(&mut alice).await {
        ServerEvent::Message(message) => {
            assert_eq!(message.username, "Admin");
            assert_eq!(message.text, "bob has left");
        },
        other => panic!("expected the leave notice, got {other:?}"),
    }
    match recv_event(&mut alice).await {
        ServerEvent::RoomData(snapshot) => {
            let names: Vec<&str> =
                snapshot.users.iter().map(|user| user.username.as_str()).collect();
            assert_eq!(names, vec!["alice"]);
        },
        other => panic!("expected the shrunken roster, got {other:?}"),
    }
}
