//! End-to-end service flows: raw strings in, wire strings out to every
//! registered subscriber.

use std::sync::{Arc, Mutex};

use playctl::app::ports::ResponseSink;
use playctl::config::ControllerConfig;
use playctl::delivery::{EVENT_DEPTH, Registration};
use playctl::protocol::{Command, Response};
use playctl::service::ControlService;
use playctl::transport::Transport;
use playctl::transport::local::LocalTransport;

use super::mock_ports::{MockCatalog, MockPlayer};

type Service = ControlService<MockCatalog, MockPlayer>;

fn service() -> Service {
    ControlService::new(
        ControllerConfig::default(),
        MockCatalog::standard(),
        MockPlayer::new(),
    )
}

fn join(svc: &mut Service) -> Arc<LocalTransport> {
    let peer = Arc::new(LocalTransport::new());
    svc.register_subscriber(peer.clone()).unwrap();
    peer
}

/// Shared capture so a test can keep reading after handing the sink over.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<Response>>>);

impl ResponseSink for SharedSink {
    fn emit(&mut self, response: &Response) {
        self.0.lock().unwrap().push(response.clone());
    }
}

#[test]
fn join_pushes_genres_status_then_connection_notice() {
    let mut svc = service();
    let peer = join(&mut svc);
    assert_eq!(
        peer.take_messages(),
        vec![
            "GENRES|rock|jazz",
            "STATUS|STOPPED|||0|0|100|0|200000",
            "CONNECTION:connected",
        ]
    );
}

#[test]
fn existing_subscribers_see_the_join() {
    let mut svc = service();
    let first = join(&mut svc);
    first.take_messages();

    let second = join(&mut svc);
    assert_eq!(svc.subscriber_count(), 2);
    assert_eq!(first.take_messages().len(), 3);
    assert_eq!(second.take_messages().len(), 3);
}

#[test]
fn duplicate_join_is_quiet() {
    let mut svc = service();
    let peer = join(&mut svc);
    peer.take_messages();

    let again = svc.register_subscriber(peer.clone()).unwrap();
    assert!(matches!(again, Registration::AlreadyPresent { .. }));
    assert!(peer.messages().is_empty());
    assert_eq!(svc.subscriber_count(), 1);
}

#[test]
fn failed_link_rejects_subscriber() {
    let mut svc = service();
    let peer = Arc::new(LocalTransport::new());
    peer.fail_link(true);
    assert!(svc.register_subscriber(peer.clone()).is_err());
    assert_eq!(svc.subscriber_count(), 0);
    assert!(peer.messages().is_empty());
}

#[test]
fn commands_are_broadcast_to_everyone() {
    let mut svc = service();
    let a = join(&mut svc);
    let b = join(&mut svc);
    a.take_messages();
    b.take_messages();

    svc.send_command("PLAY|GENRE|rock");
    let expected = "PLAYING|rock|Alpha|0|3|0|200000";
    assert_eq!(a.take_messages(), vec![expected]);
    assert_eq!(b.take_messages(), vec![expected]);
    assert_eq!(svc.last_command(), Some("PLAY|GENRE|rock"));
}

#[test]
fn failing_subscriber_is_evicted_and_others_still_served() {
    let mut svc = service();
    let good = join(&mut svc);
    let bad = join(&mut svc);
    good.take_messages();
    bad.fail_sends(true);

    svc.send_command("STOP|PLAYBACK");
    assert_eq!(good.take_messages(), vec!["STOPPED"]);
    assert_eq!(svc.subscriber_count(), 1);

    svc.send_command("GET|GENRES");
    assert_eq!(good.take_messages(), vec!["GENRES|rock|jazz"]);
}

#[test]
fn death_notice_unregisters_and_is_processed() {
    let mut svc = service();
    let a = join(&mut svc);
    let b = join(&mut svc);
    b.take_messages();

    a.kill();
    assert_eq!(svc.subscriber_count(), 1);
    assert_eq!(svc.process_lifecycle_events(), 1);

    svc.send_command("PING");
    assert_eq!(b.take_messages(), vec!["PONG"]);
}

#[test]
fn explicit_unregister_stops_delivery() {
    let mut svc = service();
    let peer = join(&mut svc);
    peer.take_messages();

    assert!(svc.unregister_subscriber(peer.identity()));
    assert!(!svc.unregister_subscriber(peer.identity()));
    svc.send_command("PING");
    assert!(peer.messages().is_empty());
    assert!(!peer.is_linked());
}

#[test]
fn unknown_command_is_reported_and_harmless() {
    let mut svc = service();
    svc.send_command("PLAY|GENRE|rock");
    let before = svc.session().clone();
    let peer = join(&mut svc);
    peer.take_messages();

    for raw in ["", "PLAY", "PLAY|TRACK|x", "VOLUME|SET|loud", "NOPE|x"] {
        svc.send_command(raw);
        assert_eq!(peer.take_messages(), vec!["ERROR|unknown command"], "{raw:?}");
    }
    assert_eq!(svc.session(), &before);
}

#[test]
fn observers_mirror_every_response() {
    let mut svc = service();
    let capture = SharedSink::default();
    svc.add_observer(capture.clone());

    svc.send_command("PING");
    svc.execute(&Command::GetStatus);
    svc.send_command("PAUSE|PLAYBACK");

    let seen = capture.0.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], Response::Pong);
    assert!(matches!(seen[1], Response::Status { .. }));
    assert_eq!(svc.last_command(), Some("GET|STATUS"));
}

#[test]
fn track_completion_is_broadcast() {
    let mut svc = service();
    svc.send_command("PLAY|INDEX|jazz|1");
    let peer = join(&mut svc);
    peer.take_messages();

    svc.on_track_completed();
    assert_eq!(
        peer.take_messages(),
        vec!["PLAYING|jazz|Blue in Green|0|2|0|200000"]
    );
}

#[test]
fn shutdown_stops_playback_and_forgets_subscribers() {
    let mut svc = service();
    let peer = join(&mut svc);
    svc.send_command("PLAY|GENRE|rock");
    peer.take_messages();

    svc.shutdown();
    assert_eq!(svc.subscriber_count(), 0);
    assert!(!svc.player().playing);
    assert!(peer.messages().is_empty());
}

#[test]
fn out_of_range_volume_is_clamped_not_rejected() {
    let mut svc = service();
    let peer = join(&mut svc);
    peer.take_messages();

    svc.send_command("VOLUME|SET|300");
    assert_eq!(peer.take_messages(), vec!["VOLUME|100"]);
    assert_eq!(svc.session().volume, 100);

    svc.send_command("VOLUME|SET|-7");
    assert_eq!(peer.take_messages(), vec!["VOLUME|0"]);
    assert_eq!(svc.session().volume, 0);
}

#[test]
fn join_is_pushed_even_when_lifecycle_channel_is_full() {
    let mut svc = service();
    let doomed: Vec<_> = (0..=EVENT_DEPTH).map(|_| join(&mut svc)).collect();
    for peer in &doomed {
        peer.kill();
    }
    assert_eq!(svc.subscriber_count(), 0);

    let fresh = join(&mut svc);
    assert_eq!(svc.subscriber_count(), 1);
    assert_eq!(
        fresh.take_messages(),
        vec![
            "GENRES|rock|jazz",
            "STATUS|STOPPED|||0|0|100|0|200000",
            "CONNECTION:connected",
        ]
    );
}

#[test]
fn joins_missed_by_the_channel_are_caught_up() {
    let mut svc = service();
    let n = EVENT_DEPTH + 8;
    let peers: Vec<_> = (0..n).map(|_| Arc::new(LocalTransport::new())).collect();
    for peer in &peers {
        svc.registry().register(peer.clone()).unwrap();
    }

    assert_eq!(svc.process_lifecycle_events(), EVENT_DEPTH);
    for peer in &peers {
        let got = peer.take_messages();
        assert_eq!(got.len(), 3 * n);
        assert_eq!(got.iter().filter(|m| *m == "CONNECTION:connected").count(), n);
    }

    // Every subscriber is greeted exactly once.
    assert_eq!(svc.process_lifecycle_events(), 0);
    assert!(peers.iter().all(|p| p.messages().is_empty()));
}
