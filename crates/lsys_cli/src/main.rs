// Copyright © Spelldawn 2021-present

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//    https://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line front-end for `lsys_driver::solve` (`spec.md` §6's "Search
//! API"). Since image I/O is an explicit Non-goal (`spec.md` §1), targets
//! are not loaded from raster files here; instead `solve` mode derives a
//! target by running a random rollout of the chosen grammar under a
//! separate seed and rasterizing it, matching `lsys_raster::target`'s
//! `DerivationTarget` — "the one loader this system actually needs".

mod config;
mod error;

use clap::{ArgEnum, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use lsys_core::config::{GrammarId, SolverConfig};
use lsys_core::tree::DerivationTree;
use lsys_driver::{solve, RootChildSummary, SolveObserver};
use lsys_grammar::derive::random_rollout;
use lsys_grammar::presets;
use lsys_raster::rasterizer::LineRasterizer;
use lsys_raster::target::DerivationTarget;

use error::CliResult;

#[derive(Parser)]
#[clap(
    name = "lsys",
    author,
    version,
    about = "Search for an L-system derivation matching a target raster via MCTS/UCT"
)]
struct Cli {
    /// Enable verbose logging output (repeat for more detail).
    #[clap(global = true, short, long, parse(from_occurrences))]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a random target from a built-in grammar, then search for a
    /// derivation that matches it.
    Solve {
        /// Which built-in grammar to derive and search with.
        #[clap(arg_enum, long, default_value = "parametric-branch")]
        grammar: GrammarArg,

        /// Optional JSON config file (`lsys_core::config::SolverConfig`);
        /// CLI flags below override whatever it sets.
        #[clap(long)]
        config: Option<String>,

        /// RNG seed used to generate the target derivation (independent of
        /// `--seed`, which seeds the search itself).
        #[clap(long, default_value = "1")]
        target_seed: u64,

        /// Number of random derivation steps used to build the target.
        #[clap(long, default_value = "8")]
        target_steps: u32,

        /// Overrides `SolverConfig::rng_seed`.
        #[clap(long)]
        seed: Option<u64>,

        /// Overrides `SolverConfig::max_mcts_iterations`.
        #[clap(long)]
        max_iterations: Option<u32>,

        /// Overrides `SolverConfig::max_derivation_steps`.
        #[clap(long)]
        max_steps: Option<u32>,
    },

    /// Write a `SolverConfig` (the default, or the preset for `--grammar`)
    /// to a JSON file for editing and reuse with `solve --config`.
    DumpConfig {
        /// Which built-in grammar's default config to dump.
        #[clap(arg_enum, long, default_value = "parametric-branch")]
        grammar: GrammarArg,

        /// Output path; prints to stdout if omitted.
        #[clap(long)]
        out: Option<String>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ArgEnum)]
enum GrammarArg {
    SimpleTree,
    StochasticBranch,
    ParametricBranch,
}

impl From<GrammarArg> for GrammarId {
    fn from(arg: GrammarArg) -> Self {
        match arg {
            GrammarArg::SimpleTree => GrammarId::SimpleTree,
            GrammarArg::StochasticBranch => GrammarId::StochasticBranch,
            GrammarArg::ParametricBranch => GrammarId::ParametricBranch,
        }
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Solve { grammar, config, target_seed, target_steps, seed, max_iterations, max_steps } => {
            run_solve(grammar, config, target_seed, target_steps, seed, max_iterations, max_steps)
        }
        Commands::DumpConfig { grammar, out } => run_dump_config(grammar, out),
    }
}

fn run_solve(
    grammar_arg: GrammarArg,
    config_path: Option<String>,
    target_seed: u64,
    target_steps: u32,
    seed_override: Option<u64>,
    max_iterations_override: Option<u32>,
    max_steps_override: Option<u32>,
) -> CliResult<()> {
    let mut solver_config = match config_path {
        Some(path) => config::load(path)?,
        None => SolverConfig { grammar_id: grammar_arg.into(), ..SolverConfig::default() },
    };
    if let Some(seed) = seed_override {
        solver_config.rng_seed = seed;
    }
    if let Some(max_iterations) = max_iterations_override {
        solver_config.max_mcts_iterations = max_iterations;
    }
    if let Some(max_steps) = max_steps_override {
        solver_config.max_derivation_steps = max_steps;
    }

    let grammar = presets::by_id(solver_config.grammar_id);
    let rasterizer = LineRasterizer;

    let mut target_state =
        lsys_core::state::State::new(DerivationTree::from_axiom(grammar.axiom.clone()));
    let mut target_rng = StdRng::seed_from_u64(target_seed);
    random_rollout(&grammar, &mut target_state, target_steps, &mut target_rng);
    let target_tree = target_state.tree().clone();
    info!(target = %target_tree.render_string(), "generated target derivation");

    let target = DerivationTarget::new(target_tree, rasterizer);
    let mut observer = PrintObserver;

    let outcome = solve(&grammar, &solver_config, &rasterizer, &target, &mut observer)?;

    println!("derivation: {}", outcome.derivation.render_string());
    println!("reward: {:.6}", outcome.reward);
    println!("derivation_steps_taken: {}", outcome.derivation_steps_taken);
    println!("completed: {}", outcome.completed);

    Ok(())
}

fn run_dump_config(grammar_arg: GrammarArg, out: Option<String>) -> CliResult<()> {
    let solver_config = SolverConfig { grammar_id: grammar_arg.into(), ..SolverConfig::default() };
    match out {
        Some(path) => config::save(&solver_config, path),
        None => {
            println!("{}", serde_json::to_string_pretty(&solver_config)?);
            Ok(())
        }
    }
}

/// Logs each root advancement via `tracing`, matching the original
/// `inverse()` loop's per-iteration progress print (`SPEC_FULL.md` §4's
/// "Supplemented from original_source/" note), without reaching for
/// `println!` in library code.
struct PrintObserver;

impl SolveObserver for PrintObserver {
    fn on_iteration(&mut self, derivation_step: u32, iterations_run: u32, root_best_reward: f64) {
        info!(derivation_step, iterations_run, root_best_reward, "root advanced");
    }

    fn on_root_advance(&mut self, derivation_step: u32, children: &[RootChildSummary]) {
        for child in children {
            tracing::debug!(
                derivation_step,
                action_id = child.action_id,
                slot = child.slot,
                visits = child.visits,
                best_reward = child.best_reward,
                "root child"
            );
        }
    }
}

fn init_logging(verbose: u8) -> CliResult<()> {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
