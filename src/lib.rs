//! Two-combatant turn-based battle engine with injectable randomness.
//!
//! The engine entry points are [`battle::start_battle`] and
//! [`battle::advance_turn`]; both are pure functions over [`battle::BattleState`].

pub mod battle;
pub mod error;
pub mod matrix;
pub mod model;
pub mod provider;
pub mod random;

use crate::battle::{simulate_battle, BattleOptions, BattleResult};
use crate::matrix::{compute_matrix, MatrixOptions};
use crate::model::{Combatant, RosterFile};
use anyhow::Context;
use std::path::{Path, PathBuf};

pub use crate::battle::{advance_turn, start_battle, BattleState, Slot};
pub use crate::error::InvalidCombatantError;
pub use crate::random::{RandomSource, ScriptedRandom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Duel { first: usize, second: usize },
    Matrix { sims_per_cell: usize },
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub roster_path: PathBuf,
    pub mode: Mode,
    pub seed: u64,
    pub max_turns: u32,
    pub output_path: PathBuf,
    pub battle: BattleOptions,
}

pub fn load_roster(path: &Path) -> anyhow::Result<Vec<Combatant>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file at {}", path.display()))?;
    parse_roster(&raw).with_context(|| format!("Failed to parse roster from {}", path.display()))
}

pub fn parse_roster(raw: &str) -> anyhow::Result<Vec<Combatant>> {
    let parsed: RosterFile = serde_json::from_str(raw)?;
    let roster = parsed
        .combatants
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            entry
                .into_combatant()
                .with_context(|| format!("roster entry {idx}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if roster.len() < 2 {
        anyhow::bail!("Expected at least 2 combatants, found {}", roster.len());
    }
    Ok(roster)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let roster = load_roster(&opts.roster_path)?;
    match opts.mode {
        Mode::Duel { first, second } => run_duel(&roster, first, second, &opts),
        Mode::Matrix { sims_per_cell } => {
            let matrix = compute_matrix(
                &roster,
                &MatrixOptions {
                    sims_per_cell,
                    seed: opts.seed,
                    max_turns: opts.max_turns,
                    battle: opts.battle,
                },
            )?;
            let names: Vec<String> = roster.iter().map(|c| c.name.clone()).collect();
            matrix::write_csv(&matrix, &names, &opts.output_path)
                .with_context(|| format!("Failed to write {}", opts.output_path.display()))?;
            println!(
                "Wrote {}x{} matrix to {}",
                matrix.len(),
                matrix.first().map(|r| r.len()).unwrap_or(0),
                opts.output_path.display()
            );
            Ok(())
        }
    }
}

fn run_duel(
    roster: &[Combatant],
    first: usize,
    second: usize,
    opts: &CliOptions,
) -> anyhow::Result<()> {
    let pick = |idx: usize| {
        roster.get(idx).ok_or_else(|| {
            anyhow::anyhow!("No combatant at index {idx} (roster has {})", roster.len())
        })
    };
    let (a, b) = (pick(first)?, pick(second)?);
    let outcome = simulate_battle(a, b, opts.battle, opts.seed, opts.max_turns)
        .context("cannot start battle")?;
    for line in &outcome.state.log {
        println!("{line}");
    }
    if outcome.result == BattleResult::Stalled {
        println!("No winner after {} turns.", outcome.turns());
    }
    Ok(())
}
