//! Integration tests for match reconstruction.
//!
//! These tests run complete replay dumps through the public API: JSON
//! decoding, state reconstruction, interval rows and checkpoints.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use std::fs;

use serde_json::json;

use matchstate::source::ReplayDump;
use matchstate::state::check_invariants;
use matchstate::{
    JsonReplay, Participant, ReconstructError, ReconstructionConfig, Reconstructor, Replay,
    ReplaySource, SourceError, TrackerEvent,
};

fn participants() -> Vec<Participant> {
    vec![
        Participant::new(1, "Alpha", "Terran"),
        Participant::new(2, "Beta", "Protoss"),
    ]
}

fn replay(events: Vec<TrackerEvent>) -> Replay {
    Replay {
        name: "test".to_string(),
        participants: participants(),
        duration: None,
        events,
        skipped: 0,
    }
}

fn stats(time: u32, participant: u8) -> TrackerEvent {
    TrackerEvent::PlayerStats {
        time,
        participant,
        stats: matchstate::state::ResourceStats::default(),
    }
}

fn born(time: u32, unit_id: u64, type_name: &str, owner: u8) -> TrackerEvent {
    TrackerEvent::UnitRegistered {
        time,
        unit_id,
        type_name: type_name.to_string(),
        owner,
    }
}

fn died(time: u32, unit_id: u64, killer: Option<u8>) -> TrackerEvent {
    TrackerEvent::UnitDied {
        time,
        unit_id,
        killer,
    }
}

fn reconstructor(checkpoints: Vec<u32>) -> Reconstructor {
    Reconstructor::new(ReconstructionConfig {
        checkpoints,
        ..ReconstructionConfig::default()
    })
    .unwrap()
}

// =============================================================================
// Kill accounting
// =============================================================================

#[test]
fn test_kill_reported_at_later_checkpoint() {
    let events = vec![
        stats(0, 1),
        stats(0, 2),
        born(10, 1, "Queen", 1),
        died(40, 1, Some(2)),
        stats(50, 1),
        stats(50, 2),
        stats(70, 1),
    ];
    let run = reconstructor(vec![60]).checkpoints(&replay(events)).unwrap();

    assert_eq!(run.checkpoints.len(), 1);
    let a = run.checkpoints[0].player(1).unwrap();
    let b = run.checkpoints[0].player(2).unwrap();
    assert_eq!(a.totals.lost_army_value, 150.0);
    assert_eq!(a.totals.army_value, 0.0);
    assert_eq!(b.totals.killed_army_value, 150.0);

    // The t=50 samples already carry the kill
    assert_eq!(a.sample.unwrap().aggregates.lost_army_value, 150.0);
    assert_eq!(b.sample.unwrap().aggregates.killed_army_value, 150.0);
}

#[test]
fn test_death_of_unregistered_unit_changes_nothing() {
    let events = vec![born(5, 1, "Marine", 1), died(20, 404, Some(2))];
    let state = Reconstructor::default().state(&replay(events));

    assert_eq!(state.aggregate(1).unwrap().army_value, 50.0);
    assert_eq!(state.aggregate(2).unwrap().killed_army_value, 0.0);
    assert_eq!(state.events_without_effect(), 1);
}

#[test]
fn test_self_kill_credits_nobody() {
    let events = vec![born(5, 1, "Marine", 1), died(20, 1, Some(1))];
    let state = Reconstructor::default().state(&replay(events));

    let a = state.aggregate(1).unwrap();
    assert_eq!(a.lost_army_value, 50.0);
    assert_eq!(a.killed_army_value, 0.0);
}

#[test]
fn test_worker_losses_are_economic() {
    let events = vec![born(5, 1, "Probe", 2), died(20, 1, Some(1))];
    let state = Reconstructor::default().state(&replay(events));

    let b = state.aggregate(2).unwrap();
    assert_eq!(b.army_value, 0.0);
    assert_eq!(b.lost_economic_value, 50.0);
    assert_eq!(b.lost_army_value, 0.0);
    assert_eq!(state.aggregate(1).unwrap().killed_economic_value, 50.0);
}

// =============================================================================
// Interval and checkpoint agreement
// =============================================================================

#[test]
fn test_interval_and_checkpoint_agree() {
    let mut events = Vec::new();
    for t in (0..=300).step_by(10) {
        if t % 30 == 0 {
            events.push(born(t, u64::from(t) + 1, "Marine", 1));
        }
        if t % 60 == 0 && t > 0 {
            events.push(died(t, u64::from(t) - 29, Some(2)));
        }
        events.push(stats(t, 1));
        events.push(stats(t, 2));
    }
    let replay = replay(events);
    let reconstructor = Reconstructor::new(ReconstructionConfig {
        interval_seconds: 10,
        checkpoints: vec![60, 120, 240],
        ..ReconstructionConfig::default()
    })
    .unwrap();

    let timeline = reconstructor.timeline(&replay);
    let run = reconstructor.checkpoints(&replay).unwrap();
    assert_eq!(run.checkpoints.len(), 3);

    for checkpoint in &run.checkpoints {
        let row = timeline
            .snapshots
            .iter()
            .find(|r| r.time == checkpoint.time)
            .unwrap();
        for frame in &row.players {
            let captured = checkpoint.player(frame.participant).unwrap();
            assert_eq!(captured.sample.unwrap(), frame.sample);
            assert_eq!(captured.totals, frame.sample.aggregates);
        }
    }
}

// =============================================================================
// JSON replay dumps
// =============================================================================

fn dump_json() -> serde_json::Value {
    json!({
        "players": [
            { "pid": 1, "name": "Alpha", "play_race": "Terran" },
            { "pid": 2, "name": "Beta", "play_race": "Zerg" },
            { "pid": 3, "name": "Caster", "is_observer": true }
        ],
        "duration_seconds": 130,
        "events": [
            { "event": "PlayerStatsEvent", "second": 0, "pid": 1,
              "minerals_collection_rate": 0, "vespene_collection_rate": 0,
              "minerals_current": 50, "vespene_current": 0, "food_used": 12, "food_made": 15 },
            { "event": "PlayerStatsEvent", "second": 0, "pid": 2,
              "minerals_collection_rate": 0, "vespene_collection_rate": 0,
              "minerals_current": 50, "vespene_current": 0, "food_used": 12, "food_made": 14 },
            { "event": "UnitBornEvent", "second": 0, "unit_id": 10, "unit_type_name": "SCV", "control_pid": 1 },
            { "event": "UnitBornEvent", "second": 30, "unit_id": 11, "unit_type_name": "Marine", "control_pid": 1 },
            { "event": "UnitBornEvent", "second": 35, "unit_id": 20, "unit_type_name": "Roach", "control_pid": 2 },
            { "event": "UnitTypeChangeEvent", "second": 80, "unit_id": 20, "unit_type_name": "Ravager" },
            { "event": "UnitDiedEvent", "second": 100, "unit_id": 11, "killer_pid": 2 },
            { "event": "UnitDiedEvent", "second": 101 },
            { "event": "UpgradeCompleteEvent", "second": 110, "pid": 1, "upgrade_type_name": "Stimpack" },
            { "event": "PlayerStatsEvent", "second": 120, "pid": 1,
              "minerals_collection_rate": 700, "vespene_collection_rate": 100,
              "minerals_current": 300, "vespene_current": 80, "food_used": 30, "food_made": 39 },
            { "event": "PlayerStatsEvent", "second": 125, "pid": 2,
              "minerals_collection_rate": 650, "vespene_collection_rate": 150,
              "minerals_current": 100, "vespene_current": 20, "food_used": 28, "food_made": 36 },
            { "event": "CameraEvent", "second": 126 }
        ]
    })
}

fn write_dump(
    dir: &tempfile::TempDir,
    name: &str,
    value: &serde_json::Value,
) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

#[test]
fn test_json_replay_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dump(&dir, "ladder_game.json", &dump_json());

    let reconstructor = Reconstructor::default();
    let replay = reconstructor.load(&JsonReplay::new(&path)).unwrap();
    assert_eq!(replay.name, "ladder_game");
    assert_eq!(replay.participants.len(), 2);
    assert_eq!(replay.skipped, 1);
    assert_eq!(replay.events.len(), 10);

    let report = reconstructor.report(&replay).unwrap();
    let alpha = &report.summary[0];
    let beta = &report.summary[1];
    assert_eq!(alpha.totals.lost_army_value, 50.0);
    assert_eq!(alpha.upgrades, vec!["Stimpack".to_string()]);
    assert_eq!(alpha.units.get("SCV"), Some(&1));
    assert_eq!(beta.totals.killed_army_value, 50.0);
    assert_eq!(beta.totals.army_value, 250.0);

    // Rows every 7s up to 126; no event falls in (126, 130] so no partial row
    assert_eq!(report.snapshots.last().unwrap().time, 126);
    assert_eq!(report.checkpoints.len(), 1);
    assert_eq!(report.checkpoints[0].time, 120);
    assert_eq!(report.checkpoints[0].player(2).unwrap().units.get("Ravager"), Some(&1));
    assert!(check_invariants(&reconstructor.state(&replay)).is_empty());
}

#[test]
fn test_missing_file_is_source_error() {
    let err = JsonReplay::new("/nonexistent/replay.json").load().unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
}

#[test]
fn test_unreadable_envelope_is_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"players\": ").unwrap();

    let err = Reconstructor::default()
        .load(&JsonReplay::new(&path))
        .unwrap_err();
    assert!(matches!(err, ReconstructError::Source(SourceError::Json { .. })));
}

#[test]
fn test_single_player_is_source_error() {
    let mut value = dump_json();
    value["players"] = json!([{ "pid": 1, "name": "Solo" }]);
    let dump: ReplayDump = serde_json::from_value(value).unwrap();

    let err = dump.into_replay("solo").unwrap_err();
    assert!(matches!(err, SourceError::TooFewParticipants { found: 1 }));
}

#[test]
fn test_report_serializes_flat_samples() {
    let dump: ReplayDump = serde_json::from_value(dump_json()).unwrap();
    let replay = dump.into_replay("m").unwrap();
    let report = Reconstructor::default().report(&replay).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    let frame = &json["snapshots"][0]["players"][0];
    assert_eq!(frame["participant"], 1);
    assert_eq!(frame["supply_cap"], 15.0);
    assert_eq!(frame["army_value"], 0.0);
}
