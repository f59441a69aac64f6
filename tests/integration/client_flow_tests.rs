//! RemoteClient driving a ControlService through an in-process link.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use playctl::client::{CommandLink, ConnectionState, RemoteClient};
use playctl::config::ControllerConfig;
use playctl::protocol::{Inbound, PlayerState, Response};
use playctl::service::ControlService;
use playctl::transport::local::LocalTransport;
use playctl::transport::{Transport, TransportError};

use super::mock_ports::{MockCatalog, MockPlayer};

type Shared = Rc<RefCell<ControlService<MockCatalog, MockPlayer>>>;

struct InProcessLink {
    service: Shared,
    endpoint: Arc<LocalTransport>,
}

impl CommandLink for InProcessLink {
    fn connect(&mut self) -> Result<(), TransportError> {
        self.service
            .borrow_mut()
            .register_subscriber(self.endpoint.clone())
            .map(|_| ())
            .map_err(|_| TransportError::LinkFailed)
    }

    fn send_command(&mut self, raw: &str) -> Result<(), TransportError> {
        if !self.endpoint.is_alive() {
            return Err(TransportError::Disconnected);
        }
        self.service.borrow_mut().send_command(raw);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.service
            .borrow_mut()
            .unregister_subscriber(self.endpoint.identity());
    }
}

fn setup() -> (Shared, RemoteClient<InProcessLink>, Arc<LocalTransport>) {
    let service = Rc::new(RefCell::new(ControlService::new(
        ControllerConfig::default(),
        MockCatalog::standard(),
        MockPlayer::new(),
    )));
    let endpoint = Arc::new(LocalTransport::new());
    let client = RemoteClient::new(InProcessLink {
        service: Rc::clone(&service),
        endpoint: Arc::clone(&endpoint),
    });
    (service, client, endpoint)
}

/// Feed everything the endpoint received into the client.
fn pump(client: &mut RemoteClient<InProcessLink>, endpoint: &LocalTransport) -> Vec<Inbound> {
    endpoint
        .take_messages()
        .iter()
        .map(|m| client.on_message(m))
        .collect()
}

#[test]
fn connect_receives_snapshot_and_notice() {
    let (_svc, mut client, endpoint) = setup();
    client.connect();
    assert_eq!(client.state(), ConnectionState::Connected);

    let inbound = pump(&mut client, &endpoint);
    assert_eq!(inbound.len(), 3);
    assert!(matches!(inbound[0], Inbound::Response(Response::Genres { .. })));
    assert!(matches!(
        client.last_response(),
        Some(Response::Status {
            state: PlayerState::Stopped,
            ..
        })
    ));
    assert_eq!(client.state(), ConnectionState::Connected);
}

#[test]
fn shortcuts_round_trip_through_the_service() {
    let (svc, mut client, endpoint) = setup();
    client.connect();
    pump(&mut client, &endpoint);

    client.play_genre("jazz").unwrap();
    client.next("jazz").unwrap();
    client.volume_down().unwrap();
    pump(&mut client, &endpoint);

    assert_eq!(client.last_message(), Some("VOLUME|90"));
    assert_eq!(svc.borrow().session().index, 1);

    client.get_current_song().unwrap();
    pump(&mut client, &endpoint);
    assert!(matches!(
        client.last_response(),
        Some(Response::Playing { title, .. }) if title == "So What"
    ));
}

#[test]
fn ping_keeps_last_message() {
    let (_svc, mut client, endpoint) = setup();
    client.connect();
    client.get_genres().unwrap();
    pump(&mut client, &endpoint);
    let before = client.last_message().map(str::to_owned);

    client.ping().unwrap();
    let inbound = pump(&mut client, &endpoint);
    assert_eq!(inbound, vec![Inbound::Pong]);
    assert_eq!(client.last_message().map(str::to_owned), before);
}

#[test]
fn disconnect_unregisters() {
    let (svc, mut client, _endpoint) = setup();
    client.connect();
    assert_eq!(svc.borrow().subscriber_count(), 1);

    client.disconnect();
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert_eq!(svc.borrow().subscriber_count(), 0);
}

#[test]
fn dead_link_moves_client_to_error() {
    let (_svc, mut client, endpoint) = setup();
    client.connect();
    endpoint.kill();

    assert_eq!(client.stop(), Err(TransportError::Disconnected));
    assert_eq!(client.state(), ConnectionState::Error);
}
