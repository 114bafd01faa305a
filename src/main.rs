use pokemon_battle_engine::battle::BattleOptions;
use pokemon_battle_engine::model::StatPolicy;
use pokemon_battle_engine::{run, CliOptions, Mode};
use std::env;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --release -- [--roster roster.json] [--pair I,J] [--seed SEED] [--max-turns N] \
[--lenient-stats] [--matrix [--sims-per-cell N] [--output matrix.csv]]"
    );
    std::process::exit(1);
}

fn parse_pair(val: &str) -> anyhow::Result<(usize, usize)> {
    let (first, second) = val
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("--pair expects two indices like 0,1, got {val}"))?;
    Ok((first.trim().parse()?, second.trim().parse()?))
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut roster_path = PathBuf::from("roster.json");
    let mut pair = (0usize, 1usize);
    let mut matrix = false;
    let mut sims_per_cell = 100usize;
    let mut seed = 0u64;
    let mut max_turns = 500u32;
    let mut output_path = PathBuf::from("matrix.csv");
    let mut battle = BattleOptions::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--roster" => {
                roster_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--roster requires a path (e.g. --roster roster.json)")
                })?;
            }
            "--pair" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--pair requires two indices"))?;
                pair = parse_pair(&val)?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = val.parse()?;
            }
            "--max-turns" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-turns requires a number"))?;
                max_turns = val.parse()?;
            }
            "--matrix" => matrix = true,
            "--sims-per-cell" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sims-per-cell requires a number"))?;
                sims_per_cell = val.parse()?;
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output matrix.csv)")
                })?;
            }
            "--lenient-stats" => battle.stat_policy = StatPolicy::Lenient,
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    let mode = if matrix {
        Mode::Matrix { sims_per_cell }
    } else {
        Mode::Duel {
            first: pair.0,
            second: pair.1,
        }
    };
    Ok(CliOptions {
        roster_path,
        mode,
        seed,
        max_turns,
        output_path,
        battle,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = parse_args()?;
    run(opts)
}
