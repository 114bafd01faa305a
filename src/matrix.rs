use crate::battle::{simulate_battle, BattleOptions, BattleResult};
use crate::model::Combatant;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct MatrixOptions {
    pub sims_per_cell: usize,
    pub seed: u64,
    pub max_turns: u32,
    pub battle: BattleOptions,
}

/// Row-vs-column win rates: `matrix[i][j]` is how often roster `i` in slot 1
/// beats roster `j` in slot 2. Stalled battles count as half a win.
pub fn compute_matrix(
    roster: &[Combatant],
    opts: &MatrixOptions,
) -> anyhow::Result<Vec<Vec<f64>>> {
    if opts.sims_per_cell == 0 {
        anyhow::bail!("sims per cell must be > 0");
    }
    for combatant in roster {
        combatant.validate(opts.battle.stat_policy)?;
    }

    let tasks: Vec<(usize, usize)> = (0..roster.len())
        .flat_map(|a| (0..roster.len()).map(move |b| (a, b)))
        .collect();
    let cell_results: Vec<anyhow::Result<CellResult>> = tasks
        .par_iter()
        .map(|&(a_idx, b_idx)| -> anyhow::Result<CellResult> {
            let mut cell_rng =
                SmallRng::seed_from_u64(opts.seed ^ ((a_idx as u64) << 32) ^ (b_idx as u64));
            let mut wins = 0u64;
            let mut stalls = 0u64;
            for _ in 0..opts.sims_per_cell {
                let battle_seed = cell_rng.gen();
                let outcome = simulate_battle(
                    &roster[a_idx],
                    &roster[b_idx],
                    opts.battle,
                    battle_seed,
                    opts.max_turns,
                )?;
                match outcome.result {
                    BattleResult::SlotOneWins => wins += 1,
                    BattleResult::SlotTwoWins => {}
                    BattleResult::Stalled => stalls += 1,
                }
            }
            let total = opts.sims_per_cell as f64;
            Ok(CellResult {
                a_idx,
                b_idx,
                win_rate: (wins as f64 + 0.5 * stalls as f64) / total,
            })
        })
        .collect();

    let mut matrix = vec![vec![0.0; roster.len()]; roster.len()];
    for cell in cell_results {
        let cell = cell?;
        matrix[cell.a_idx][cell.b_idx] = cell.win_rate;
    }
    Ok(matrix)
}

pub fn write_csv(
    matrix: &[Vec<f64>],
    names: &[String],
    path: &std::path::Path,
) -> anyhow::Result<()> {
    std::fs::write(path, render_csv(matrix, names))?;
    Ok(())
}

/// Header row of names, then one named row per combatant.
pub fn render_csv(matrix: &[Vec<f64>], names: &[String]) -> String {
    let mut out = String::new();
    for name in names {
        out.push(',');
        out.push_str(name);
    }
    for (row_idx, row) in matrix.iter().enumerate() {
        out.push('\n');
        out.push_str(names.get(row_idx).map(String::as_str).unwrap_or(""));
        for value in row {
            out.push(',');
            out.push_str(&format!("{value:.4}"));
        }
    }
    out
}

struct CellResult {
    a_idx: usize,
    b_idx: usize,
    win_rate: f64,
}
