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

//! `solve(target, config) -> Derivation` (`spec.md` §6), and the two
//! optional inspection hooks `spec.md` §6 names: a per-iteration
//! best-reward callback and a per-root dump of `(action_index, visits,
//! best_reward)` per child.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use lsys_core::config::SolverConfig;
use lsys_core::error::SearchError;
use lsys_core::state::State;
use lsys_core::tree::DerivationTree;
use lsys_grammar::enumerate::enumerate_actions;
use lsys_grammar::grammar::Grammar;
use lsys_mcts::driver::{best_child, mcts_driver};
use lsys_mcts::tree::SearchTree;
use lsys_raster::rasterizer::Rasterizer;
use lsys_raster::reward::RewardEvaluator;
use lsys_raster::target::TargetLoader;

/// `(action_index, visits, best_reward)` for one child of a root, captured
/// after a root's MCTS budget is spent — the second `spec.md` §6
/// inspection hook.
#[derive(Debug, Clone, PartialEq)]
pub struct RootChildSummary {
    pub action_id: u32,
    pub slot: usize,
    pub visits: u32,
    pub best_reward: f64,
}

/// The result of a completed (or step-budget-exhausted) solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub derivation: DerivationTree,
    pub reward: f64,
    pub derivation_steps_taken: u32,
    /// True if the winning state's pending queue was empty — the
    /// derivation actually completed rather than merely running out of
    /// step budget.
    pub completed: bool,
    /// One entry per root advancement, in order.
    pub root_history: Vec<Vec<RootChildSummary>>,
}

/// Returned when `solve` must abort mid-run (`spec.md` §7): the caller
/// still receives whatever derivation was best before the failure.
#[derive(Debug)]
pub struct SolveAborted {
    pub error: SearchError,
    pub partial: SolveOutcome,
}

impl std::fmt::Display for SolveAborted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "solve aborted: {}", self.error)
    }
}

impl std::error::Error for SolveAborted {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// The two inspection hooks `spec.md` §6 calls for. Default
/// implementations are no-ops; override whichever a caller needs
/// (diagnostics, test assertions over search trajectories).
pub trait SolveObserver {
    /// Called once a root's MCTS budget is spent, with the iteration count
    /// reached and the winning child's best-reward-so-far.
    fn on_iteration(&mut self, derivation_step: u32, iterations_run: u32, root_best_reward: f64) {
        let _ = (derivation_step, iterations_run, root_best_reward);
    }

    /// Called once per root advancement with a dump of every child of the
    /// root whose budget was just spent.
    fn on_root_advance(&mut self, derivation_step: u32, children: &[RootChildSummary]) {
        let _ = (derivation_step, children);
    }
}

/// An observer that does nothing; the default when a caller has no use for
/// the inspection hooks.
pub struct NullObserver;

impl SolveObserver for NullObserver {}

/// Run the top-level inverse-derivation loop (`spec.md` §4.4): seed a root
/// with `grammar`'s axiom, then repeatedly spend an MCTS budget and advance
/// to the best child, until the derivation completes or
/// `config.max_derivation_steps` is exhausted.
pub fn solve<R: Rasterizer>(
    grammar: &Grammar,
    config: &SolverConfig,
    rasterizer: &R,
    target: &dyn TargetLoader,
    observer: &mut dyn SolveObserver,
) -> Result<SolveOutcome, SolveAborted> {
    config.validate().map_err(|error| SolveAborted {
        error,
        partial: empty_outcome(grammar),
    })?;

    let evaluator = RewardEvaluator::new(rasterizer, config);
    let mut rng = StdRng::seed_from_u64(config.rng_seed);
    let mut current_state = State::new(DerivationTree::from_axiom(grammar.axiom.clone()));
    let mut root_history = Vec::new();

    // Boundary: an axiom with no pending nonterminals solves instantly, no
    // MCTS iteration runs (`spec.md` §8).
    if current_state.is_complete() {
        let reward = evaluator
            .evaluate(current_state.tree(), target)
            .map_err(|error| SolveAborted { error, partial: empty_outcome(grammar) })?;
        return Ok(SolveOutcome {
            derivation: current_state.tree().clone(),
            reward,
            derivation_steps_taken: 0,
            completed: true,
            root_history,
        });
    }

    let mut steps_taken = 0u32;

    for derivation_step in 0..config.max_derivation_steps {
        steps_taken = derivation_step;
        let untried = enumerate_actions(grammar, &current_state);
        let root_had_actions = !untried.is_empty();
        let mut tree = SearchTree::new(current_state.make_copy(), untried);

        if let Err(error) = mcts_driver(&mut tree, grammar, config, &evaluator, target, &mut rng) {
            let partial = finish(&current_state, &evaluator, target, derivation_step, root_history.clone())
                .unwrap_or_else(|_| incomplete_outcome(&current_state, derivation_step, root_history.clone()));
            return Err(SolveAborted { error, partial });
        }

        let root = tree.root();
        let summaries: Vec<RootChildSummary> = tree
            .children(root)
            .map(|child| {
                let node = tree.node(child);
                RootChildSummary {
                    action_id: node.selected_action.as_ref().map_or(0, |a| a.id),
                    slot: node.selected_action.as_ref().map_or(0, |a| a.slot),
                    visits: node.visits,
                    best_reward: node.best_reward,
                }
            })
            .collect();
        observer.on_root_advance(derivation_step, &summaries);
        root_history.push(summaries);

        debug!(derivation_step, visits = tree.node(root).visits, "spent mcts budget for root");

        let Some(winner) = best_child(&tree, root) else {
            if !root_had_actions {
                // The head symbol offered no actions at all: fatal for this
                // MCTS cycle per `SearchError::EmptyActionSet`'s contract,
                // terminating early with the current root-best as the
                // partial outcome.
                let partial = finish(&current_state, &evaluator, target, derivation_step, root_history.clone())
                    .unwrap_or_else(|_| incomplete_outcome(&current_state, derivation_step, root_history.clone()));
                return Err(SolveAborted { error: SearchError::EmptyActionSet, partial });
            }
            // Actions existed but the MCTS budget (`max_mcts_iterations`)
            // never expanded a single child -- the boundary case of
            // `spec.md` §8 ("`max_mcts_iterations = 0`: `solve` returns the
            // axiom"). Nothing more to do on this branch.
            steps_taken = derivation_step + 1;
            break;
        };

        let winner_best_reward = tree.node(winner).best_reward;
        observer.on_iteration(derivation_step, tree.node(root).visits, winner_best_reward);

        current_state = tree.node(winner).state.make_copy();
        steps_taken = derivation_step + 1;
        if current_state.is_complete() {
            let result = finish(&current_state, &evaluator, target, steps_taken, root_history)
                .map_err(|error| SolveAborted {
                    error,
                    partial: incomplete_outcome(&current_state, steps_taken, Vec::new()),
                })?;
            info!(steps = result.derivation_steps_taken, reward = result.reward, "solve completed");
            return Ok(result);
        }
    }

    finish(&current_state, &evaluator, target, steps_taken, root_history.clone())
        .map_err(|error| SolveAborted {
            error,
            partial: incomplete_outcome(&current_state, steps_taken, root_history),
        })
}

fn finish<R: Rasterizer>(
    state: &State,
    evaluator: &RewardEvaluator<'_, R>,
    target: &dyn TargetLoader,
    derivation_steps_taken: u32,
    root_history: Vec<Vec<RootChildSummary>>,
) -> Result<SolveOutcome, SearchError> {
    let reward = evaluator.evaluate(state.tree(), target)?;
    Ok(SolveOutcome {
        derivation: state.tree().clone(),
        reward,
        derivation_steps_taken,
        completed: state.is_complete(),
        root_history,
    })
}

fn incomplete_outcome(
    state: &State,
    derivation_steps_taken: u32,
    root_history: Vec<Vec<RootChildSummary>>,
) -> SolveOutcome {
    SolveOutcome {
        derivation: state.tree().clone(),
        reward: f64::NEG_INFINITY,
        derivation_steps_taken,
        completed: state.is_complete(),
        root_history,
    }
}

fn empty_outcome(grammar: &Grammar) -> SolveOutcome {
    SolveOutcome {
        derivation: DerivationTree::from_axiom(grammar.axiom.clone()),
        reward: f64::NEG_INFINITY,
        derivation_steps_taken: 0,
        completed: false,
        root_history: Vec::new(),
    }
}
