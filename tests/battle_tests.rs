use pokemon_battle_engine::battle::{
    advance_turn, base_damage, compute_damage, run_battle, simulate_battle, start_battle,
    start_battle_with, BattleOptions, BattleResult, BattleState, HpBand, LastMove, Slot,
};
use pokemon_battle_engine::model::{Combatant, StatPolicy};
use pokemon_battle_engine::random::{seeded, ScriptedRandom};
use pokemon_battle_engine::InvalidCombatantError;

fn make_mon(name: &str, hp: i64, attack: i64, defense: i64, speed: i64) -> Combatant {
    Combatant::new(name, hp)
        .with_stat("hp", hp)
        .with_stat("attack", attack)
        .with_stat("defense", defense)
        .with_stat("speed", speed)
}

fn striker() -> Combatant {
    make_mon("Striker", 100, 50, 30, 10)
}

fn wall() -> Combatant {
    make_mon("Wall", 100, 10, 100, 0)
}

fn midpoint_battle() -> BattleState {
    let mut rng = ScriptedRandom::constant(0.5);
    start_battle(&striker(), &wall(), &mut rng).unwrap()
}

#[test]
fn start_battle_initialises_state() {
    let state = midpoint_battle();
    assert_eq!(state.hp(Slot::One), 100);
    assert_eq!(state.hp(Slot::Two), 100);
    assert!(!state.finished);
    assert_eq!(state.winner, None);
    assert_eq!(state.last_move, None);
    assert_eq!(state.turn, 0);
    assert_eq!(state.active_turn, Slot::One);
    assert_eq!(state.log, vec!["Battle starts!", "Striker goes first!"]);
}

#[test]
fn first_turn_roll_picks_either_slot() {
    let mut low = ScriptedRandom::new([0.1]);
    let mut high = ScriptedRandom::new([0.9]);
    let a = start_battle(&striker(), &wall(), &mut low).unwrap();
    let b = start_battle(&striker(), &wall(), &mut high).unwrap();
    assert_eq!(a.active_turn, Slot::One);
    assert_eq!(b.active_turn, Slot::Two);
    assert_eq!(b.log[1], "Wall goes first!");
}

#[test]
fn midpoint_turn_deals_floored_base_damage() {
    let state = midpoint_battle();
    let mut rng = ScriptedRandom::constant(0.5);
    let next = advance_turn(&state, &mut rng);
    // floor(50 * 0.5 * (100 / 150)) = 16
    assert_eq!(next.hp(Slot::Two), 84);
    assert_eq!(next.hp(Slot::One), 100);
    assert_eq!(next.active_turn, Slot::Two);
    assert_eq!(
        next.last_move,
        Some(LastMove {
            attacker: Slot::One,
            damage: 16,
            is_critical: false,
        })
    );
    assert_eq!(next.log.last().unwrap(), "Striker deals 16 damage to Wall!");
    // the input snapshot is untouched
    assert_eq!(state.hp(Slot::Two), 100);
}

#[test]
fn defense_eighty_takes_nineteen() {
    let bulwark = make_mon("Bulwark", 100, 10, 80, 0);
    let mut rng = ScriptedRandom::constant(0.5);
    let state = start_battle(&striker(), &bulwark, &mut rng).unwrap();
    let next = advance_turn(&state, &mut rng);
    assert_eq!(next.last_move.unwrap().damage, 19);
    assert_eq!(next.hp(Slot::Two), 81);
    assert_eq!(next.active_turn, Slot::Two);
}

#[test]
fn critical_hit_multiplies_damage() {
    // variance 1.0, then a critical roll under 10/512
    let mut rng = ScriptedRandom::new([0.5, 0.0]);
    let roll = compute_damage(&striker(), &wall(), &mut rng);
    assert!(roll.is_critical);
    assert_eq!(roll.damage, 24); // floor(16 * 1.5)
}

#[test]
fn variance_bounds_damage() {
    let mut low = ScriptedRandom::new([0.0, 0.99]);
    let mut high = ScriptedRandom::new([0.999_999, 0.99]);
    assert_eq!(compute_damage(&striker(), &wall(), &mut low).damage, 14);
    assert_eq!(compute_damage(&striker(), &wall(), &mut high).damage, 17);
}

#[test]
fn zero_speed_never_crits() {
    let mut rng = ScriptedRandom::new([0.5, 0.0]);
    let roll = compute_damage(&wall(), &striker(), &mut rng);
    assert!(!roll.is_critical);
}

#[test]
fn base_damage_is_floored() {
    assert_eq!(base_damage(50, 30), 31.0);
    assert_eq!(base_damage(50, 80), 19.0);
    assert_eq!(base_damage(50, 100), 16.0);
    assert_eq!(base_damage(0, 30), 0.0);
    assert_eq!(base_damage(100, 50), 50.0);
}

#[test]
fn killing_blow_finishes_battle() {
    let glass = make_mon("Glass", 5, 10, 0, 0);
    let mut rng = ScriptedRandom::constant(0.5);
    let state = start_battle(&striker(), &glass, &mut rng).unwrap();
    let next = advance_turn(&state, &mut rng);
    assert!(next.finished);
    assert_eq!(next.hp(Slot::Two), 0);
    assert_eq!(next.winner, Some(Slot::One));
    assert_eq!(next.winner_combatant().unwrap().name, "Striker");
    assert_eq!(next.active_turn, Slot::One);
    assert_eq!(next.log.len(), state.log.len() + 2);
    assert_eq!(next.log.last().unwrap(), "Striker wins the battle!");
}

#[test]
fn finished_battle_is_unchanged() {
    let glass = make_mon("Glass", 5, 10, 0, 0);
    let mut rng = ScriptedRandom::constant(0.5);
    let state = start_battle(&striker(), &glass, &mut rng).unwrap();
    let finished = advance_turn(&state, &mut rng);

    let mut scripted = ScriptedRandom::new([0.1, 0.2, 0.3]);
    let again = advance_turn(&finished, &mut scripted);
    assert_eq!(again, finished);
    assert_eq!(scripted.remaining(), 3);
}

#[test]
fn turns_alternate_and_hp_never_negative() {
    let a = make_mon("Alpha", 60, 80, 40, 60);
    let b = make_mon("Beta", 70, 70, 50, 90);
    for seed in 0..20 {
        let mut rng = seeded(seed);
        let mut state = start_battle(&a, &b, &mut rng).unwrap();
        while !state.finished {
            let before = state.clone();
            state = advance_turn(&before, &mut rng);
            assert!(state.hp(Slot::One) >= 0 && state.hp(Slot::Two) >= 0);
            assert!(state.hp(Slot::One) <= a.hp && state.hp(Slot::Two) <= b.hp);
            let grown = state.log.len() - before.log.len();
            if state.finished {
                assert_eq!(grown, 2);
                assert_eq!(state.active_turn, before.active_turn);
                assert_eq!(state.winner, Some(before.active_turn));
            } else {
                assert_eq!(grown, 1);
                assert_eq!(state.active_turn, before.active_turn.opponent());
            }
            assert_eq!(state.log[..before.log.len()], before.log[..]);
        }
    }
}

#[test]
fn missing_stat_is_rejected() {
    let no_speed = Combatant::new("Slowpoke", 90)
        .with_stat("attack", 65)
        .with_stat("defense", 65);
    let mut rng = ScriptedRandom::constant(0.5);
    let err = start_battle(&no_speed, &wall(), &mut rng).unwrap_err();
    assert_eq!(
        err,
        InvalidCombatantError::MissingStat {
            name: "Slowpoke".to_string(),
            stat: "speed",
        }
    );
    assert!(err.to_string().contains("cannot start battle"));
}

#[test]
fn non_positive_hp_and_negative_stats_are_rejected() {
    let mut rng = ScriptedRandom::constant(0.5);
    let fainted = make_mon("Ghost", 0, 10, 10, 10);
    assert!(matches!(
        start_battle(&fainted, &wall(), &mut rng),
        Err(InvalidCombatantError::NonPositiveHp { hp: 0, .. })
    ));
    let cursed = make_mon("Cursed", 10, -1, 10, 10);
    assert!(matches!(
        start_battle(&wall(), &cursed, &mut rng),
        Err(InvalidCombatantError::NegativeStat { value: -1, .. })
    ));
    let lenient = BattleOptions {
        stat_policy: StatPolicy::Lenient,
    };
    assert!(start_battle_with(&wall(), &cursed, lenient, &mut rng).is_err());
}

#[test]
fn negative_optional_stat_is_allowed() {
    let odd = make_mon("Oddity", 40, 30, 30, 30).with_stat("special-attack", -5);
    let mut rng = ScriptedRandom::constant(0.5);
    let state = start_battle(&odd, &wall(), &mut rng).unwrap();
    assert_eq!(state.combatant(Slot::One).stat("special-attack"), Some(-5));
}

#[test]
fn absent_attack_deals_no_damage() {
    let pacifist = Combatant::new("Pacifist", 50)
        .with_stat("defense", 10)
        .with_stat("speed", 100);
    let options = BattleOptions {
        stat_policy: StatPolicy::Lenient,
    };
    let mut rng = ScriptedRandom::constant(0.5);
    let mut state = start_battle_with(&pacifist, &wall(), options, &mut rng).unwrap();
    assert_eq!(state.active_turn, Slot::One);
    for _ in 0..10 {
        state = advance_turn(&state, &mut rng);
    }
    assert_eq!(state.hp(Slot::Two), 100);
    assert!(state.log.iter().any(|l| l == "Pacifist deals 0 damage to Wall!"));
}

#[test]
fn stalled_battle_hits_turn_cap() {
    let a = make_mon("Harmless", 50, 0, 10, 0);
    let b = make_mon("Also Harmless", 50, 0, 10, 0);
    let options = BattleOptions::default();
    let outcome = simulate_battle(&a, &b, options, 3, 25).unwrap();
    assert_eq!(outcome.result, BattleResult::Stalled);
    assert_eq!(outcome.turns(), 25);
    assert!(!outcome.state.finished);
}

#[test]
fn run_battle_reports_winner() {
    let mut rng = ScriptedRandom::constant(0.5);
    let state = start_battle(&striker(), &make_mon("Weak", 30, 5, 0, 0), &mut rng).unwrap();
    let outcome = run_battle(state, &mut rng, 500);
    assert_eq!(outcome.result, BattleResult::SlotOneWins);
    assert!(outcome.state.finished);
}

#[test]
fn simulate_battle_is_deterministic_per_seed() {
    let a = make_mon("Alpha", 60, 80, 40, 60);
    let b = make_mon("Beta", 70, 70, 50, 90);
    let first = simulate_battle(&a, &b, BattleOptions::default(), 11, 500).unwrap();
    let second = simulate_battle(&a, &b, BattleOptions::default(), 11, 500).unwrap();
    assert_eq!(first.state, second.state);
}

#[test]
fn hp_band_follows_thresholds() {
    let mut state = midpoint_battle();
    assert_eq!(state.hp_band(Slot::One), HpBand::Healthy);
    state.current_hp = [50, 21];
    assert_eq!(state.hp_band(Slot::One), HpBand::Caution);
    assert_eq!(state.hp_band(Slot::Two), HpBand::Caution);
    state.current_hp = [20, 0];
    assert_eq!(state.hp_band(Slot::One), HpBand::Critical);
    assert_eq!(state.hp_percentage(Slot::One), 20.0);
    assert_eq!(state.hp_percentage(Slot::Two), 0.0);
}

#[test]
fn state_survives_json_round_trip() {
    let mut rng = seeded(5);
    let mut state = start_battle(&striker(), &wall(), &mut rng).unwrap();
    for _ in 0..4 {
        state = advance_turn(&state, &mut rng);
    }
    let json = serde_json::to_string(&state).unwrap();
    let restored: BattleState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["activeTurn"] == 1 || value["activeTurn"] == 2);
    assert_eq!(value["currentHp"].as_array().unwrap().len(), 2);
}
