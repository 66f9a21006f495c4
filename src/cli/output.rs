//! Output formatting utilities for CLI.

use matchstate::reconstruct::ParticipantSummary;
use matchstate::snapshot::BatchWindow;
use matchstate::{Checkpoint, Snapshot};

/// Format `m:ss` from whole seconds.
fn clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format interval rows as human-readable text.
pub(super) fn format_timeline_text(rows: &[Snapshot]) -> String {
    let mut output = String::new();

    for row in rows {
        output.push_str(&format!("[{}]\n", clock(row.time)));
        for frame in &row.players {
            let s = &frame.sample;
            output.push_str(&format!(
                "  P{}: {:.0}m {:.0}g  income {:.0}/{:.0}  supply {:.0}/{:.0}  army {:.1}  killed {:.1}  lost {:.1}\n",
                frame.participant,
                s.stats.minerals,
                s.stats.gas,
                s.stats.mineral_rate,
                s.stats.gas_rate,
                s.stats.supply_used,
                s.stats.supply_cap,
                s.aggregates.army_value,
                s.aggregates.killed_army_value,
                s.aggregates.lost_army_value,
            ));
        }
    }

    output
}

const TIMELINE_CSV_COLUMNS: &str = "time,participant,sample_time,mineral_rate,gas_rate,minerals,gas,supply_used,supply_cap,army_value,killed_army_value,lost_army_value,killed_economic_value,lost_economic_value";

/// Append one CSV line per participant in `row`, each starting with `prefix`.
fn push_csv_row(output: &mut String, prefix: &str, row: &Snapshot) {
    for frame in &row.players {
        let s = &frame.sample;
        let a = &s.aggregates;
        output.push_str(&format!(
            "{prefix}{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            row.time,
            frame.participant,
            s.time,
            s.stats.mineral_rate,
            s.stats.gas_rate,
            s.stats.minerals,
            s.stats.gas,
            s.stats.supply_used,
            s.stats.supply_cap,
            a.army_value,
            a.killed_army_value,
            a.lost_army_value,
            a.killed_economic_value,
            a.lost_economic_value,
        ));
    }
}

/// Format interval rows as CSV, one line per participant per row.
pub(super) fn format_timeline_csv(rows: &[Snapshot]) -> String {
    let mut output = format!("{TIMELINE_CSV_COLUMNS}\n");
    for row in rows {
        push_csv_row(&mut output, "", row);
    }
    output
}

/// Format windowed interval rows as CSV with a leading window index column.
pub(super) fn format_windows_csv(windows: &[BatchWindow<'_>]) -> String {
    let mut output = format!("window,{TIMELINE_CSV_COLUMNS}\n");
    for window in windows {
        let prefix = format!("{},", window.index);
        for row in window.rows {
            push_csv_row(&mut output, &prefix, row);
        }
    }
    output
}

/// Format checkpoints as human-readable text.
pub(super) fn format_checkpoints_text(checkpoints: &[Checkpoint]) -> String {
    let mut output = String::new();

    if checkpoints.is_empty() {
        output.push_str("No checkpoints reached.\n");
        return output;
    }

    for checkpoint in checkpoints {
        output.push_str(&format!("Checkpoint {}\n", clock(checkpoint.time)));
        for frame in &checkpoint.players {
            let t = &frame.totals;
            output.push_str(&format!(
                "  {} ({}): army {:.1}  killed {:.1}/{:.1}  lost {:.1}/{:.1}\n",
                frame.name,
                frame.faction,
                t.army_value,
                t.killed_army_value,
                t.killed_economic_value,
                t.lost_army_value,
                t.lost_economic_value,
            ));
            match &frame.sample {
                Some(s) => output.push_str(&format!(
                    "    resources {:.0}m {:.0}g  supply {:.0}/{:.0}  (sampled {})\n",
                    s.stats.minerals,
                    s.stats.gas,
                    s.stats.supply_used,
                    s.stats.supply_cap,
                    clock(s.time)
                )),
                None => output.push_str("    resources: no sample yet\n"),
            }
            if !frame.units.is_empty() {
                let units: Vec<String> = frame
                    .units
                    .iter()
                    .map(|(name, count)| format!("{count}x {name}"))
                    .collect();
                output.push_str(&format!("    units: {}\n", units.join(", ")));
            }
            if !frame.upgrades.is_empty() {
                output.push_str(&format!("    upgrades: {}\n", frame.upgrades.join(", ")));
            }
        }
    }

    output
}

/// Format end-of-match totals as human-readable text.
pub(super) fn format_summary_text(
    name: &str,
    duration: u32,
    skipped: usize,
    without_effect: usize,
    summary: &[ParticipantSummary],
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match {name} ({})\n", clock(duration)));
    output.push_str(&format!(
        "  Events skipped: {skipped}, without effect: {without_effect}\n\n"
    ));

    for p in summary {
        let t = &p.totals;
        output.push_str(&format!(
            "  Player {}: {} ({})\n",
            p.participant, p.name, p.faction
        ));
        output.push_str(&format!(
            "    army {:.1}  killed army {:.1}  lost army {:.1}\n",
            t.army_value, t.killed_army_value, t.lost_army_value
        ));
        output.push_str(&format!(
            "    killed economy {:.1}  lost economy {:.1}  samples {}\n",
            t.killed_economic_value, t.lost_economic_value, p.samples
        ));
        let live: u32 = p.units.values().sum();
        output.push_str(&format!("    live units: {live}\n"));
        if !p.upgrades.is_empty() {
            output.push_str(&format!("    upgrades: {}\n", p.upgrades.join(", ")));
        }
    }

    output
}
