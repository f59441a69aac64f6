//! Integration tests for the Controller → ports → responses pipeline.
//!
//! These verify the full command-handling chain from a decoded command
//! down to playback calls and emitted responses, against mock ports.

use playctl::app::Controller;
use playctl::config::{ControllerConfig, PauseWhenIdle};
use playctl::protocol::{Command, PlayerState, Response};

use super::mock_ports::{MockCatalog, MockPlayer, PlayerCall, RecordingSink};

struct Rig {
    ctl: Controller,
    catalog: MockCatalog,
    player: MockPlayer,
    sink: RecordingSink,
}

impl Rig {
    fn new(catalog: MockCatalog) -> Self {
        Self::with_config(catalog, ControllerConfig::default())
    }

    fn with_config(catalog: MockCatalog, config: ControllerConfig) -> Self {
        Self {
            ctl: Controller::new(config),
            catalog,
            player: MockPlayer::new(),
            sink: RecordingSink::new(),
        }
    }

    fn run(&mut self, cmd: Command) -> Vec<Response> {
        self.ctl
            .handle_command(&cmd, &self.catalog, &mut self.player, &mut self.sink);
        self.sink.take()
    }

    fn raw(&mut self, raw: &str) -> Vec<Response> {
        let cmd = Command::decode(raw).expect("test command must decode");
        self.run(cmd)
    }
}

fn genre(g: &str) -> String {
    g.to_owned()
}

// ── Selection ─────────────────────────────────────────────────

#[test]
fn play_genre_starts_first_track() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("PLAY|GENRE|rock");

    assert_eq!(
        out,
        vec![Response::Playing {
            genre: genre("rock"),
            title: "Alpha".into(),
            index: 0,
            total: 3,
            position_ms: 0,
            duration_ms: 200_000,
        }]
    );
    assert_eq!(rig.player.starts(), vec!["/music/rock/Alpha.mp3"]);
    assert!(rig.ctl.session().playing);
}

#[test]
fn play_genre_on_empty_catalog_leaves_session_unchanged() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|INDEX|rock|1");
    let before = rig.ctl.session().clone();

    let out = rig.raw("PLAY|GENRE|jazzfusion");
    assert_eq!(out, vec![Response::no_songs("jazzfusion")]);
    assert_eq!(rig.ctl.session(), &before);
    assert_eq!(rig.ctl.session().genre, "rock");
    assert_eq!(rig.ctl.session().index, 1);
}

#[test]
fn empty_catalog_emits_exactly_one_no_songs() {
    let mut rig = Rig::new(MockCatalog::empty());
    let out = rig.run(Command::PlayGenre {
        genre: genre("jazz"),
    });
    assert_eq!(out.len(), 1);
    assert_eq!(out[0], Response::error("no songs in jazz"));
    assert!(rig.ctl.session().genre.is_empty());
    assert_eq!(rig.ctl.session().index, 0);
    assert!(rig.player.calls.is_empty());
}

#[test]
fn play_song_matches_case_insensitive_substring() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("PLAY|SONG|jazz|so wh");
    assert!(matches!(
        &out[0],
        Response::Playing { title, index: 1, total: 2, .. } if title == "So What"
    ));
}

#[test]
fn play_song_without_match_is_an_error() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("PLAY|SONG|rock|Omega");
    assert_eq!(out, vec![Response::error("'Omega' not found in rock")]);
    assert!(!rig.ctl.session().playing);
}

#[test]
fn play_index_out_of_range_is_an_error() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("PLAY|INDEX|rock|3");
    assert_eq!(out, vec![Response::error("index 3 out of range (0..3)")]);
    assert!(rig.player.calls.is_empty());
}

#[test]
fn loaded_genre_is_not_rescanned() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|GENRE|rock");
    rig.raw("NEXT|GENRE|rock");
    rig.raw("PLAY|INDEX|rock|2");
    assert_eq!(rig.catalog.track_queries.get(), 1);

    rig.raw("PLAY|GENRE|jazz");
    assert_eq!(rig.catalog.track_queries.get(), 2);
}

#[test]
fn start_failure_reports_error_and_clears_playing() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.player.fail_start = true;

    let out = rig.raw("PLAY|GENRE|rock");
    assert_eq!(out.len(), 1);
    assert!(out[0].is_error());
    assert!(!rig.ctl.session().playing);
    assert_eq!(rig.ctl.session().genre, "rock");

    rig.player.fail_start = false;
    let out = rig.raw("PLAY|GENRE|rock");
    assert!(matches!(out[0], Response::Playing { .. }));
}

// ── Next / Previous ───────────────────────────────────────────

#[test]
fn next_three_times_wraps_to_first_track() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|GENRE|rock");
    rig.raw("NEXT|GENRE|rock");
    rig.raw("NEXT|GENRE|rock");
    let out = rig.raw("NEXT|GENRE|rock");

    assert_eq!(rig.ctl.session().index, 0);
    assert!(matches!(
        &out[0],
        Response::Playing { genre, index: 0, total: 3, .. } if genre == "rock"
    ));
}

#[test]
fn previous_from_first_wraps_to_last() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|GENRE|rock");
    let out = rig.raw("PREV|GENRE|rock");
    assert!(matches!(&out[0], Response::Playing { index: 2, .. }));
}

#[test]
fn next_on_unknown_genre_is_no_songs() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("NEXT|GENRE|polka");
    assert_eq!(out, vec![Response::no_songs("polka")]);
}

#[test]
fn next_on_a_new_session_steps_past_the_first_track() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("NEXT|GENRE|rock");
    assert!(matches!(
        &out[0],
        Response::Playing { genre, title, index: 1, total: 3, .. }
            if genre == "rock" && title == "Beta"
    ));
}

#[test]
fn switching_genre_keeps_stepping_from_the_current_index() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|INDEX|rock|0");
    let out = rig.raw("NEXT|GENRE|jazz");
    assert!(matches!(
        &out[0],
        Response::Playing { genre, title, index: 1, .. } if genre == "jazz" && title == "So What"
    ));
}

#[test]
fn cursor_past_the_new_list_is_clamped_before_stepping() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|INDEX|rock|2");

    let out = rig.raw("PREV|GENRE|jazz");
    assert!(matches!(&out[0], Response::Playing { index: 0, .. }));

    rig.raw("PLAY|INDEX|rock|2");
    let out = rig.raw("NEXT|GENRE|jazz");
    assert!(matches!(&out[0], Response::Playing { index: 0, .. }));
    assert!(rig.ctl.session().index < 2);
}

// ── Pause / Resume / Stop ─────────────────────────────────────

#[test]
fn pause_while_stopped_is_silent_no_op() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("PAUSE|PLAYBACK");
    assert!(out.is_empty());
    assert!(!rig.ctl.session().playing);
    assert!(rig.player.calls.is_empty());
}

#[test]
fn pause_twice_only_answers_once() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|GENRE|rock");
    assert_eq!(rig.raw("PAUSE|PLAYBACK"), vec![Response::Paused]);
    assert!(rig.raw("PAUSE|PLAYBACK").is_empty());
    assert_eq!(rig.ctl.session().player_state(), PlayerState::Paused);
}

#[test]
fn reject_policy_turns_idle_pause_into_error() {
    let config = ControllerConfig {
        pause_when_idle: PauseWhenIdle::Reject,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(MockCatalog::standard(), config);
    let out = rig.raw("PAUSE|PLAYBACK");
    assert_eq!(out.len(), 1);
    assert!(out[0].is_error());
}

#[test]
fn resume_continues_current_track() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|INDEX|rock|1");
    rig.raw("PAUSE|PLAYBACK");
    let out = rig.raw("RESUME|PLAYBACK");

    assert!(matches!(
        &out[0],
        Response::Playing { title, index: 1, .. } if title == "Beta"
    ));
    assert_eq!(rig.player.last_call(), Some(&PlayerCall::Resume));
    assert!(rig.ctl.session().playing);
}

#[test]
fn resume_on_empty_session_is_an_error() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("RESUME|PLAYBACK");
    assert_eq!(out, vec![Response::error("no current song")]);
}

#[test]
fn resume_failure_forces_not_playing() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|GENRE|rock");
    rig.raw("PAUSE|PLAYBACK");
    rig.player.fail_resume = true;

    let out = rig.raw("RESUME|PLAYBACK");
    assert!(out[0].is_error());
    assert!(!rig.ctl.session().playing);
}

#[test]
fn stop_always_answers_stopped_and_clears_session() {
    let mut rig = Rig::new(MockCatalog::standard());
    assert_eq!(rig.raw("STOP|PLAYBACK"), vec![Response::Stopped]);

    rig.raw("PLAY|GENRE|rock");
    assert_eq!(rig.raw("STOP|PLAYBACK"), vec![Response::Stopped]);
    let s = rig.ctl.session();
    assert!(s.genre.is_empty());
    assert!(s.songs.is_empty());
    assert!(!s.playing);
    assert_eq!(s.player_state(), PlayerState::Stopped);
}

// ── Queries ───────────────────────────────────────────────────

#[test]
fn get_playlist_always_rescans() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|GENRE|rock");
    let out = rig.raw("GET|PLAYLIST|rock");
    assert_eq!(
        out,
        vec![Response::Playlist {
            genre: genre("rock"),
            songs: vec!["Alpha".into(), "Beta".into(), "Gamma".into()],
        }]
    );
    assert_eq!(rig.catalog.track_queries.get(), 2);
}

#[test]
fn get_playlist_of_unknown_genre_is_empty() {
    let mut rig = Rig::new(MockCatalog::standard());
    let out = rig.raw("GET|PLAYLIST|polka");
    assert_eq!(out[0].encode(), "PLAYLIST|polka");
}

#[test]
fn get_genres_falls_back_when_discovery_is_empty() {
    let mut rig = Rig::new(MockCatalog::empty());
    let out = rig.raw("GET|GENRES");
    assert_eq!(
        out[0].encode(),
        "GENRES|Rock|Jazz|Relax|Salsa|Cumbia|Reggaeton"
    );

    let config = ControllerConfig {
        fallback_genres: Vec::new(),
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(MockCatalog::empty(), config);
    assert_eq!(rig.raw("GET|GENRES")[0].encode(), "GENRES");
}

#[test]
fn get_genres_prefers_discovery() {
    let mut rig = Rig::new(MockCatalog::standard());
    assert_eq!(rig.raw("GET|GENRES")[0].encode(), "GENRES|rock|jazz");
}

#[test]
fn get_current_song() {
    let mut rig = Rig::new(MockCatalog::standard());
    assert_eq!(
        rig.raw("GET|CURRENT_SONG"),
        vec![Response::error("no current song")]
    );

    rig.raw("PLAY|INDEX|jazz|1");
    let out = rig.raw("GET|CURRENT_SONG");
    assert!(matches!(
        &out[0],
        Response::Playing { title, index: 1, total: 2, .. } if title == "So What"
    ));
}

#[test]
fn status_reflects_derived_state() {
    let mut rig = Rig::new(MockCatalog::standard());
    assert_eq!(
        rig.raw("GET|STATUS")[0].encode(),
        "STATUS|STOPPED|||0|0|100|0|200000"
    );

    rig.raw("PLAY|INDEX|rock|2");
    rig.player.position_ms = 1_500;
    assert_eq!(
        rig.raw("GET|STATUS")[0].encode(),
        "STATUS|PLAYING|rock|Gamma|2|3|100|1500|200000"
    );

    rig.raw("PAUSE|PLAYBACK");
    let out = rig.raw("GET|STATUS");
    assert!(matches!(
        &out[0],
        Response::Status { state: PlayerState::Paused, .. }
    ));
}

#[test]
fn ping_answers_pong() {
    let mut rig = Rig::new(MockCatalog::empty());
    assert_eq!(rig.raw("PING"), vec![Response::Pong]);
}

// ── Volume / seek ─────────────────────────────────────────────

#[test]
fn volume_commands_clamp_and_apply() {
    let mut rig = Rig::new(MockCatalog::empty());
    assert_eq!(rig.raw("VOLUME|SET|40"), vec![Response::Volume { level: 40 }]);
    assert_eq!(rig.raw("VOLUME|DOWN"), vec![Response::Volume { level: 30 }]);
    assert_eq!(rig.raw("VOLUME|SET|200"), vec![Response::Volume { level: 100 }]);
    assert_eq!(rig.raw("VOLUME|UP"), vec![Response::Volume { level: 100 }]);
    assert_eq!(rig.player.last_call(), Some(&PlayerCall::Volume(100)));

    assert!(matches!(
        rig.raw("GET|STATUS")[0],
        Response::Status { volume: 100, .. }
    ));
}

#[test]
fn seek_requires_a_loaded_track() {
    let mut rig = Rig::new(MockCatalog::standard());
    assert_eq!(
        rig.raw("SEEK|POSITION|5000"),
        vec![Response::error("no current song")]
    );

    rig.raw("PLAY|GENRE|rock");
    assert_eq!(
        rig.raw("SEEK|POSITION|5000"),
        vec![Response::Progress {
            current_ms: 5_000,
            duration_ms: 200_000,
        }]
    );
    assert_eq!(rig.player.last_call(), Some(&PlayerCall::Seek(5_000)));
}

#[test]
fn get_progress_reports_engine_position() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|GENRE|rock");
    rig.player.position_ms = 42;
    assert_eq!(rig.raw("GET|PROGRESS")[0].encode(), "PROGRESS|42|200000");
}

// ── Lifecycle callbacks ───────────────────────────────────────

#[test]
fn subscriber_join_pushes_genres_then_status() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.ctl
        .on_subscriber_connected(1, &rig.catalog, &rig.player, &mut rig.sink);
    let out = rig.sink.take();
    assert_eq!(out.len(), 2);
    assert!(matches!(out[0], Response::Genres { .. }));
    assert!(matches!(out[1], Response::Status { .. }));
}

#[test]
fn track_completion_advances_with_wraparound() {
    let mut rig = Rig::new(MockCatalog::standard());
    rig.raw("PLAY|INDEX|rock|2");
    rig.ctl.on_track_completed(&mut rig.player, &mut rig.sink);
    let out = rig.sink.take();
    assert!(matches!(&out[0], Response::Playing { index: 0, .. }));
    assert_eq!(rig.player.starts().last(), Some(&"/music/rock/Alpha.mp3"));
}

#[test]
fn track_completion_without_auto_advance_stops() {
    let config = ControllerConfig {
        auto_advance: false,
        ..ControllerConfig::default()
    };
    let mut rig = Rig::with_config(MockCatalog::standard(), config);
    rig.raw("PLAY|GENRE|rock");
    rig.player.playing = false;
    rig.ctl.on_track_completed(&mut rig.player, &mut rig.sink);

    let out = rig.sink.take();
    assert!(matches!(
        out[0],
        Response::Status { state: PlayerState::Paused, .. }
    ));
    assert_eq!(rig.player.starts().len(), 1);
}
