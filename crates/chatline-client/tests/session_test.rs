//! Session behavior against the simulated transport.
//!
//! Each test drives a [`Session`] over a [`SimNetwork`] and checks three
//! oracles: the session's own state, what reached the wire, and what the
//! user was shown.

use std::sync::Arc;

use chatline_client::{
    ConnectionId, ConnectionState, Endpoint, Inbound, Session, SessionError, TransportError,
    messages,
};
use chatline_harness::{RecordingPresenter, SimNetwork, SimTransport};
use tokio::sync::mpsc;

struct Fixture {
    session: Session<SimTransport>,
    network: SimNetwork,
    presenter: Arc<RecordingPresenter>,
    inbound: mpsc::Receiver<Inbound>,
}

/// Disconnected session on `localhost:5555` with no identity.
fn fixture() -> Fixture {
    let (network, inbound) = SimNetwork::new();
    let presenter = Arc::new(RecordingPresenter::new());
    let session = Session::new(network.transport(), Endpoint::default(), presenter.clone());
    Fixture { session, network, presenter, inbound }
}

/// Connected session with identity `alice`.
async fn connected_as_alice() -> Fixture {
    let f = fixture();
    f.session.set_identity("alice").await;
    f.session.connect().await.unwrap();
    f
}

#[tokio::test]
async fn connect_presents_identity_first() {
    let f = connected_as_alice().await;

    assert_eq!(f.session.state().await, ConnectionState::Connected);
    assert_eq!(f.network.sent(), vec!["#login alice"]);
    assert_eq!(f.presenter.messages(), vec![messages::CONNECTED]);
}

#[tokio::test]
async fn connect_without_identity_sends_nothing() {
    let f = fixture();

    f.session.connect().await.unwrap();

    assert_eq!(f.session.state().await, ConnectionState::Connected);
    assert!(f.network.sent().is_empty());
    assert!(f.presenter.contains(messages::CONNECTED));
}

#[tokio::test]
async fn identity_is_read_at_connect_time() {
    let f = fixture();
    f.session.set_identity("first").await;
    f.session.set_identity("second").await;

    f.session.connect().await.unwrap();

    assert_eq!(f.session.identity().await.as_deref(), Some("second"));
    assert_eq!(f.network.sent(), vec!["#login second"]);
}

#[tokio::test]
async fn failed_connect_is_recoverable() {
    let f = fixture();
    f.session.set_identity("alice").await;
    f.network.fail_opens(true);

    let err = f.session.connect().await.unwrap_err();
    assert!(matches!(err, SessionError::Connect(TransportError::Connect(_))));
    assert_eq!(f.session.state().await, ConnectionState::Disconnected);
    assert_eq!(f.presenter.messages(), vec![messages::CONNECT_FAILED]);
    assert!(f.network.sent().is_empty());

    f.network.fail_opens(false);
    f.session.connect().await.unwrap();
    assert_eq!(f.session.state().await, ConnectionState::Connected);
    assert_eq!(f.network.sent(), vec!["#login alice"]);
}

#[tokio::test]
async fn connect_while_connected_skips_the_open() {
    let f = connected_as_alice().await;

    f.session.connect().await.unwrap();

    assert_eq!(f.network.opens(), 1);
    assert_eq!(f.network.sent(), vec!["#login alice"]);
    assert_eq!(f.presenter.last().as_deref(), Some(messages::ALREADY_CONNECTED));
}

#[tokio::test]
async fn undeliverable_login_closes_the_new_connection() {
    let f = fixture();
    f.session.set_identity("alice").await;
    f.network.fail_sends(true);

    let err = f.session.connect().await.unwrap_err();

    assert!(matches!(err, SessionError::Transmit(_)));
    assert_eq!(f.session.state().await, ConnectionState::Disconnected);
    assert_eq!(f.network.live(), None);
    assert_eq!(f.network.closes(), 1);
    assert_eq!(f.presenter.messages(), vec![messages::CONNECT_FAILED]);
    assert!(!f.session.is_terminated().await);
}

#[tokio::test]
async fn disconnect_closes_and_reports() {
    let f = connected_as_alice().await;

    f.session.disconnect().await.unwrap();

    assert_eq!(f.session.state().await, ConnectionState::Disconnected);
    assert_eq!(f.network.live(), None);
    assert_eq!(f.presenter.last().as_deref(), Some(messages::CLOSED));
}

#[tokio::test]
async fn disconnect_is_disconnected_even_when_close_fails() {
    let f = connected_as_alice().await;
    f.network.fail_closes(true);

    let err = f.session.disconnect().await.unwrap_err();

    assert!(matches!(err, SessionError::Close(_)));
    assert_eq!(f.session.state().await, ConnectionState::Disconnected);
    assert_eq!(f.presenter.last().as_deref(), Some(messages::CLOSE_FAILED));
}

#[tokio::test]
async fn disconnect_while_disconnected_does_not_touch_transport() {
    let f = fixture();

    f.session.disconnect().await.unwrap();

    assert_eq!(f.network.closes(), 0);
    assert_eq!(f.presenter.messages(), vec![messages::CLOSED]);
}

#[tokio::test]
async fn reconnect_presents_identity_once_per_connect() {
    let f = connected_as_alice().await;

    f.session.disconnect().await.unwrap();
    f.session.connect().await.unwrap();

    assert_eq!(f.network.opens(), 2);
    assert_eq!(f.network.sent(), vec!["#login alice", "#login alice"]);
}

#[tokio::test]
async fn endpoint_changes_apply_while_disconnected() {
    let f = fixture();

    f.session.set_endpoint(Some("chat.example.org".into()), None).await.unwrap();
    f.session.set_endpoint(None, Some(7000)).await.unwrap();

    assert_eq!(f.session.endpoint().await, Endpoint::new("chat.example.org", 7000));
    assert!(f.presenter.messages().is_empty());

    f.session.connect().await.unwrap();
    assert_eq!(f.network.opened(), vec![Endpoint::new("chat.example.org", 7000)]);
}

#[tokio::test]
async fn endpoint_changes_rejected_while_connected() {
    let f = connected_as_alice().await;

    let err = f.session.set_endpoint(Some("elsewhere".into()), None).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidState { field: "host" }));
    assert_eq!(f.presenter.last().as_deref(), Some(messages::HOST_WHILE_CONNECTED));

    let err = f.session.set_endpoint(None, Some(1)).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidState { field: "port" }));
    assert_eq!(f.presenter.last().as_deref(), Some(messages::PORT_WHILE_CONNECTED));

    assert_eq!(f.session.endpoint().await, Endpoint::default());
}

#[tokio::test]
async fn payload_is_sent_verbatim() {
    let f = connected_as_alice().await;

    f.session.send_payload("hello world").await.unwrap();

    assert_eq!(f.network.sent(), vec!["#login alice", "hello world"]);
}

#[tokio::test]
async fn failed_send_terminates_the_session() {
    let f = fixture();

    let err = f.session.send_payload("hello world").await.unwrap_err();

    assert!(matches!(err, SessionError::Transmit(TransportError::NotConnected)));
    assert!(f.session.is_terminated().await);
    assert_eq!(f.presenter.messages(), vec![messages::SEND_FAILED]);
    assert_eq!(f.network.drops(), 1);
}

#[tokio::test]
async fn broken_connection_on_send_terminates_and_closes() {
    let f = connected_as_alice().await;
    f.network.fail_sends(true);

    let err = f.session.send_payload("hello").await.unwrap_err();

    assert!(matches!(err, SessionError::Transmit(TransportError::Io(_))));
    assert_eq!(f.session.state().await, ConnectionState::Terminated);
    assert_eq!(f.network.closes(), 1);
    assert_eq!(f.network.drops(), 1);
}

#[tokio::test]
async fn terminate_releases_transport_exactly_once() {
    let f = connected_as_alice().await;
    f.network.fail_closes(true);

    f.session.terminate().await;
    f.session.terminate().await;

    assert!(f.session.is_terminated().await);
    assert_eq!(f.network.closes(), 1);
    assert_eq!(f.network.drops(), 1);
    // Close errors on terminate are not shown
    assert!(!f.presenter.contains(messages::CLOSE_FAILED));
}

#[tokio::test]
async fn operations_after_terminate_are_rejected() {
    let f = fixture();
    f.session.set_endpoint(Some("kept.example".into()), None).await.unwrap();
    f.session.terminate().await;
    f.presenter.clear();

    assert!(matches!(f.session.connect().await, Err(SessionError::Terminated)));
    assert!(matches!(f.session.disconnect().await, Err(SessionError::Terminated)));
    assert!(matches!(f.session.send_payload("x").await, Err(SessionError::Terminated)));
    assert!(matches!(
        f.session.set_endpoint(None, Some(1)).await,
        Err(SessionError::Terminated)
    ));

    assert_eq!(f.session.endpoint().await.host, "kept.example");
    assert_eq!(f.network.opens(), 0);
    assert!(f.presenter.messages().is_empty());
}

#[tokio::test]
async fn inbound_messages_are_displayed_verbatim() {
    let f = connected_as_alice().await;
    let connection = f.network.live().unwrap();

    f.session
        .handle_inbound(Inbound::Message { connection, payload: "bob> hi there".into() })
        .await;
    f.session.on_receive("SERVER SHUTTING DOWN");

    let messages = f.presenter.messages();
    assert_eq!(&messages[1..], ["bob> hi there", "SERVER SHUTTING DOWN"]);
}

#[tokio::test]
async fn lost_connection_returns_to_disconnected() {
    let f = connected_as_alice().await;
    let connection = f.network.live().unwrap();

    f.session.handle_inbound(Inbound::Closed { connection }).await;

    assert_eq!(f.session.state().await, ConnectionState::Disconnected);
    assert_eq!(f.network.live(), None);
    assert_eq!(f.presenter.last().as_deref(), Some(messages::CONNECTION_LOST));

    // Endpoint may be changed again once the connection is gone
    f.session.set_endpoint(None, Some(6000)).await.unwrap();
    assert_eq!(f.session.endpoint().await.port, 6000);
}

#[tokio::test]
async fn stale_close_notice_is_ignored() {
    let mut f = connected_as_alice().await;
    let first = f.network.live().unwrap();
    f.session.disconnect().await.unwrap();
    f.session.connect().await.unwrap();
    f.presenter.clear();

    assert!(f.network.report_closed(first));
    assert!(f.network.report_closed(ConnectionId(999)));
    while let Ok(event) = f.inbound.try_recv() {
        f.session.handle_inbound(event).await;
    }

    assert_eq!(f.session.state().await, ConnectionState::Connected);
    assert!(f.network.live().is_some());
    assert!(f.presenter.messages().is_empty());
}

#[tokio::test]
async fn message_from_replaced_connection_is_dropped() {
    let mut f = connected_as_alice().await;
    let first = f.network.live().unwrap();
    assert!(f.network.deliver("bob> before logoff"));
    f.session.disconnect().await.unwrap();
    f.session.connect().await.unwrap();
    assert!(f.network.deliver("bob> after login"));
    f.presenter.clear();

    while let Ok(event) = f.inbound.try_recv() {
        f.session.handle_inbound(event).await;
    }

    assert_ne!(f.network.live(), Some(first));
    assert_eq!(f.presenter.messages(), vec!["bob> after login"]);
}
