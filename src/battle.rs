use crate::error::InvalidCombatantError;
use crate::model::{Combatant, StatPolicy, ATTACK, DEFENSE, SPEED};
use crate::random::{seeded, RandomSource};
use serde::{Deserialize, Serialize};
use std::fmt;

const CRITICAL_MULTIPLIER: f64 = 1.5;
const CRITICAL_SPEED_DIVISOR: f64 = 512.0;

/// Positional side of a battle, serialized as `1` or `2`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub fn opponent(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::One => 0,
            Slot::Two => 1,
        }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        match slot {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Slot::One),
            2 => Ok(Slot::Two),
            other => Err(format!("slot must be 1 or 2, got {other}")),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BattleOptions {
    pub stat_policy: StatPolicy,
}

/// Outcome of the most recent turn, kept for animation cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMove {
    pub attacker: Slot,
    pub damage: i64,
    pub is_critical: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRoll {
    pub damage: i64,
    pub is_critical: bool,
}

/// Health-bar colouring bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HpBand {
    Healthy,
    Caution,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleState {
    pub combatants: [Combatant; 2],
    pub current_hp: [i64; 2],
    pub active_turn: Slot,
    pub log: Vec<String>,
    pub finished: bool,
    pub winner: Option<Slot>,
    pub last_move: Option<LastMove>,
    pub turn: u32,
}

impl BattleState {
    pub fn combatant(&self, slot: Slot) -> &Combatant {
        &self.combatants[slot.index()]
    }

    pub fn hp(&self, slot: Slot) -> i64 {
        self.current_hp[slot.index()]
    }

    pub fn winner_combatant(&self) -> Option<&Combatant> {
        self.winner.map(|slot| self.combatant(slot))
    }

    pub fn hp_percentage(&self, slot: Slot) -> f64 {
        let max = self.combatant(slot).hp;
        if max <= 0 {
            return 0.0;
        }
        self.hp(slot) as f64 / max as f64 * 100.0
    }

    pub fn hp_band(&self, slot: Slot) -> HpBand {
        let current = self.hp(slot) as f64;
        let max = self.combatant(slot).hp as f64;
        if current > max * 0.5 {
            HpBand::Healthy
        } else if current > max * 0.2 {
            HpBand::Caution
        } else {
            HpBand::Critical
        }
    }
}

/// Starts a battle with strict stat validation.
pub fn start_battle(
    combatant1: &Combatant,
    combatant2: &Combatant,
    rng: &mut dyn RandomSource,
) -> Result<BattleState, InvalidCombatantError> {
    start_battle_with(combatant1, combatant2, BattleOptions::default(), rng)
}

pub fn start_battle_with(
    combatant1: &Combatant,
    combatant2: &Combatant,
    options: BattleOptions,
    rng: &mut dyn RandomSource,
) -> Result<BattleState, InvalidCombatantError> {
    combatant1.validate(options.stat_policy)?;
    combatant2.validate(options.stat_policy)?;

    let first = if rng.next_float() <= 0.5 {
        Slot::One
    } else {
        Slot::Two
    };
    let combatants = [combatant1.clone(), combatant2.clone()];
    let log = vec![
        "Battle starts!".to_string(),
        format!("{} goes first!", combatants[first.index()].name),
    ];
    tracing::debug!(
        slot_one = %combatant1.name,
        slot_two = %combatant2.name,
        first = %first,
        "battle started"
    );
    Ok(BattleState {
        current_hp: [combatant1.hp, combatant2.hp],
        combatants,
        active_turn: first,
        log,
        finished: false,
        winner: None,
        last_move: None,
        turn: 0,
    })
}

/// Resolves one attack and returns the next snapshot.
///
/// A finished battle is returned unchanged and consumes no random draws.
pub fn advance_turn(state: &BattleState, rng: &mut dyn RandomSource) -> BattleState {
    let mut next = state.clone();
    if next.finished {
        return next;
    }

    let attacker_slot = next.active_turn;
    let defender_slot = attacker_slot.opponent();
    let roll = compute_damage(
        next.combatant(attacker_slot),
        next.combatant(defender_slot),
        rng,
    );

    let remaining = (next.hp(defender_slot) - roll.damage).max(0);
    next.current_hp[defender_slot.index()] = remaining;

    let attacker_name = next.combatant(attacker_slot).name.clone();
    let defender_name = next.combatant(defender_slot).name.clone();
    next.log.push(attack_message(
        &attacker_name,
        &defender_name,
        roll.damage,
        roll.is_critical,
    ));
    tracing::debug!(
        turn = next.turn + 1,
        attacker = %attacker_name,
        damage = roll.damage,
        critical = roll.is_critical,
        defender_hp = remaining,
        "turn resolved"
    );

    if remaining == 0 {
        next.finished = true;
        next.winner = Some(attacker_slot);
        next.log.push(format!("{attacker_name} wins the battle!"));
        tracing::info!(winner = %attacker_name, slot = %attacker_slot, "battle won");
    } else {
        next.active_turn = defender_slot;
    }

    next.last_move = Some(LastMove {
        attacker: attacker_slot,
        damage: roll.damage,
        is_critical: roll.is_critical,
    });
    next.turn = next.turn.saturating_add(1);
    next
}

fn attack_message(attacker: &str, defender: &str, damage: i64, is_critical: bool) -> String {
    if is_critical {
        format!("{attacker} lands a critical hit and deals {damage} damage to {defender}!")
    } else {
        format!("{attacker} deals {damage} damage to {defender}!")
    }
}

/// Base damage before variance and critical multiplier.
pub fn base_damage(attack: i64, defense: i64) -> f64 {
    (attack as f64 * 0.5 * (100.0 / (defense as f64 + 50.0))).floor()
}

/// Draws variance first, then the critical roll.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut dyn RandomSource,
) -> DamageRoll {
    let base = base_damage(attacker.stat_or_zero(ATTACK), defender.stat_or_zero(DEFENSE));
    let variance = 0.9 + rng.next_float() * 0.2;
    let critical_chance = attacker.stat_or_zero(SPEED) as f64 / CRITICAL_SPEED_DIVISOR;
    let is_critical = rng.next_float() < critical_chance;
    let multiplier = if is_critical { CRITICAL_MULTIPLIER } else { 1.0 };
    let damage = (base * variance * multiplier).floor().max(0.0) as i64;
    DamageRoll {
        damage,
        is_critical,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BattleResult {
    SlotOneWins,
    SlotTwoWins,
    /// The turn cap ran out before either side fainted.
    Stalled,
}

#[derive(Clone, Debug)]
pub struct BattleOutcome {
    pub result: BattleResult,
    pub state: BattleState,
}

impl BattleOutcome {
    pub fn turns(&self) -> u32 {
        self.state.turn
    }
}

/// Plays `advance_turn` until someone wins or `max_turns` turns elapse.
pub fn run_battle(
    mut state: BattleState,
    rng: &mut dyn RandomSource,
    max_turns: u32,
) -> BattleOutcome {
    while !state.finished && state.turn < max_turns {
        state = advance_turn(&state, rng);
    }
    let result = match state.winner {
        Some(Slot::One) => BattleResult::SlotOneWins,
        Some(Slot::Two) => BattleResult::SlotTwoWins,
        None => {
            tracing::warn!(
                max_turns,
                slot_one = %state.combatant(Slot::One).name,
                slot_two = %state.combatant(Slot::Two).name,
                "battle stalled at turn cap"
            );
            BattleResult::Stalled
        }
    };
    BattleOutcome { result, state }
}

pub fn simulate_battle(
    combatant1: &Combatant,
    combatant2: &Combatant,
    options: BattleOptions,
    seed: u64,
    max_turns: u32,
) -> Result<BattleOutcome, InvalidCombatantError> {
    let mut rng = seeded(seed);
    let state = start_battle_with(combatant1, combatant2, options, &mut rng)?;
    Ok(run_battle(state, &mut rng, max_turns))
}
