#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use matchstate::snapshot::capture_checkpoints;
use matchstate::state::{check_invariants, ResourceStats, ValueModel};
use matchstate::{Participant, Replay, TrackerEvent};

/// Unit types drawn from, including worker, unknown and morph targets.
const TYPES: [&str; 8] = [
    "Marine", "SCV", "Drone", "Roach", "Ravager", "SiegeTank", "Bunker", "Larva",
];

/// One fuzzed event. Ids and participants are kept small so events collide.
#[derive(Arbitrary, Debug)]
enum FuzzEvent {
    Stats { time: u16, participant: u8, minerals: u16 },
    Register { time: u16, unit: u8, kind: u8, owner: u8 },
    Retype { time: u16, unit: u8, kind: u8 },
    Die { time: u16, unit: u8, killer: Option<u8> },
    Upgrade { time: u16, participant: u8, kind: u8 },
}

impl FuzzEvent {
    fn into_event(self) -> TrackerEvent {
        let type_name = |kind: u8| TYPES[kind as usize % TYPES.len()].to_string();
        match self {
            FuzzEvent::Stats { time, participant, minerals } => TrackerEvent::PlayerStats {
                time: u32::from(time),
                participant: participant % 4,
                stats: ResourceStats {
                    minerals: f64::from(minerals),
                    ..ResourceStats::default()
                },
            },
            FuzzEvent::Register { time, unit, kind, owner } => TrackerEvent::UnitRegistered {
                time: u32::from(time),
                unit_id: u64::from(unit % 32),
                type_name: type_name(kind),
                owner: owner % 4,
            },
            FuzzEvent::Retype { time, unit, kind } => TrackerEvent::UnitRetyped {
                time: u32::from(time),
                unit_id: u64::from(unit % 32),
                type_name: type_name(kind),
            },
            FuzzEvent::Die { time, unit, killer } => TrackerEvent::UnitDied {
                time: u32::from(time),
                unit_id: u64::from(unit % 32),
                killer: killer.map(|k| k % 4),
            },
            FuzzEvent::Upgrade { time, participant, kind } => TrackerEvent::UpgradeCompleted {
                time: u32::from(time),
                participant: participant % 4,
                upgrade: format!("Upgrade{}", kind % 4),
            },
        }
    }
}

#[derive(Arbitrary, Debug)]
struct StreamInput {
    events: Vec<FuzzEvent>,
    checkpoints: Vec<u16>,
}

fuzz_target!(|input: StreamInput| {
    let replay = Replay {
        name: "fuzz".to_string(),
        participants: vec![
            Participant::new(1, "Alpha", "Terran"),
            Participant::new(2, "Beta", "Zerg"),
        ],
        duration: None,
        events: input.events.into_iter().take(2000).map(FuzzEvent::into_event).collect(),
        skipped: 0,
    };

    let mut checkpoints: Vec<u32> = input.checkpoints.iter().map(|&t| u32::from(t)).collect();
    checkpoints.sort_unstable();
    checkpoints.dedup();

    // Invariants must hold however malformed the stream is
    if let Ok(run) = capture_checkpoints(&replay, ValueModel::standard(), &checkpoints) {
        let violations = check_invariants(&run.state);
        assert!(violations.is_empty(), "{violations:?}");
        assert!(run.checkpoints.windows(2).all(|w| w[0].time < w[1].time));
    }
});
