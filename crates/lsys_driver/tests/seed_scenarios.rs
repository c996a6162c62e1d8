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

//! Integration coverage for the seed scenarios of `spec.md` §8 not already
//! exercised by `lsys_driver::solve`'s own unit tests: angle
//! discretization, branch-vs-extend preference, and prune correctness
//! after root advancement.

use rand::rngs::StdRng;
use rand::SeedableRng;

use lsys_core::action::ActionKind;
use lsys_core::config::{GrammarId, RewardForm, SolverConfig};
use lsys_core::state::State;
use lsys_core::symbol::{Symbol, SymbolName};
use lsys_core::tree::DerivationTree;
use lsys_driver::{solve, NullObserver};
use lsys_grammar::enumerate::enumerate_actions;
use lsys_grammar::presets;
use lsys_mcts::driver::{best_child, mcts_driver};
use lsys_mcts::tree::SearchTree;
use lsys_raster::rasterizer::LineRasterizer;
use lsys_raster::reward::RewardEvaluator;
use lsys_raster::target::DerivationTarget;

fn base_config() -> SolverConfig {
    SolverConfig {
        max_derivation_steps: 4,
        max_mcts_iterations: 200,
        max_rollout_depth: 3,
        grammar_id: GrammarId::SimpleTree,
        exploration_constant: 0.5,
        exploration_variance_weight: 0.0,
        reward_form: RewardForm::PixelPair,
        reward_alpha: 10000.0,
        reward_beta: 5000.0,
        grid_size: 24,
        render_scale: 1.0,
        rng_seed: 99,
        progressive_widening: false,
    }
}

#[test]
fn angle_discretization_selects_the_target_angle() {
    // Seed scenario 3 (`spec.md` §8): with a small angle grid and a target
    // rendered at a fixed angle, MCTS must select the matching angle as the
    // best child of the `+` slot, with that child's visit share at least
    // `1 / grid size` -- exercised directly at the `+` slot (rather than
    // through the full `solve()` derivation loop, where the root's decision
    // is the `X` rule, not the angle) by rooting a search tree at a state
    // whose head is already the pending `Plus` symbol.
    //
    // The symbol after `+` is left as a pending `X` (not a terminal `F`), so
    // each angle child still has its own untried rule actions once chosen --
    // a terminal `F` there would make every angle child a complete,
    // fully-explored leaf after a single visit, marking it `fixed` and
    // excluding it from further selection, which would cap its visits at 1
    // and make the visit-share assertion below unmeetable regardless of how
    // good its reward is.
    let grammar = presets::parametric_branch();
    let rasterizer = LineRasterizer;

    let axiom = vec![
        Symbol::with_parameters(SymbolName::F, 0, vec![1.0, 0.1]),
        Symbol::pending(SymbolName::Plus, 0),
        Symbol::with_parameters(SymbolName::X, 0, vec![1.0, 0.1, 0.0]),
    ];
    let root_state = State::new(DerivationTree::from_axiom(axiom));
    let root_untried = enumerate_actions(&grammar, &root_state);
    let mut tree = SearchTree::new(root_state, root_untried);

    // Reachable by picking the 60-degree action for `+` followed by X's
    // "stop" rule (which replaces X with a single F segment carrying X's own
    // length/radius) -- an exact match, giving this branch a reward ceiling
    // of 1.0 that no other angle can reach, since no continuation under a
    // different heading reproduces this image.
    let target_tree = DerivationTree::from_axiom(vec![
        Symbol::with_parameters(SymbolName::F, 0, vec![1.0, 0.1]),
        Symbol::with_parameters(SymbolName::Plus, 0, vec![60.0]),
        Symbol::with_parameters(SymbolName::F, 1, vec![1.0, 0.1]),
    ]);
    let target = DerivationTarget::new(target_tree, rasterizer);

    let config = SolverConfig {
        max_mcts_iterations: 300,
        grammar_id: GrammarId::ParametricBranch,
        ..base_config()
    };
    let evaluator = RewardEvaluator::new(&rasterizer, &config);
    let mut rng = StdRng::seed_from_u64(config.rng_seed);

    mcts_driver(&mut tree, &grammar, &config, &evaluator, &target, &mut rng).expect("driver runs");

    let root = tree.root();
    let winner = best_child(&tree, root).expect("root has children");
    let winner_action = tree.node(winner).selected_action.clone().expect("child has an action");
    let ActionKind::Value(angle) = winner_action.kind else {
        panic!("expected the `+` slot's child action to be a value action");
    };
    assert!((angle - 60.0).abs() < 1e-9, "expected the 60-degree child to win, got {angle}");

    let grid_size = grammar.angle_grid_degrees.len() as u32;
    let min_visits = config.max_mcts_iterations / grid_size;
    assert!(
        tree.node(winner).visits >= min_visits,
        "expected the winning child's visits ({}) to be at least max_iterations / {grid_size} ({min_visits})",
        tree.node(winner).visits,
    );
}

#[test]
fn branch_vs_extend_prefers_branching_for_a_y_shape_target() {
    // Seed scenario 4 (`spec.md` §8): a Y-shaped target should drive MCTS
    // toward the branching rule at the root.
    let grammar = presets::simple_tree();
    let rasterizer = LineRasterizer;

    // `simple_tree`'s branch rule turns at a fixed ±45 degrees (its
    // `angle_grid_degrees` holds only `[45.0]`), so the target is rendered
    // at that same fixed angle -- otherwise no derivation in this grammar
    // could ever reach the literal `reward > 0.9` bound `spec.md` §8 names.
    let target_tree = DerivationTree::from_axiom(vec![
        Symbol::with_parameters(SymbolName::F, 0, vec![1.0, 0.1]),
        Symbol::structural(SymbolName::Push, 0),
        Symbol::with_parameters(SymbolName::Minus, 0, vec![-45.0]),
        Symbol::with_parameters(SymbolName::F, 1, vec![1.0, 0.1]),
        Symbol::structural(SymbolName::Pop, 0),
        Symbol::structural(SymbolName::Push, 0),
        Symbol::with_parameters(SymbolName::Plus, 0, vec![45.0]),
        Symbol::with_parameters(SymbolName::F, 1, vec![1.0, 0.1]),
        Symbol::structural(SymbolName::Pop, 0),
    ]);
    let target = DerivationTarget::new(target_tree, rasterizer);

    let config = SolverConfig { max_mcts_iterations: 200, ..base_config() };
    let outcome = solve(&grammar, &config, &rasterizer, &target, &mut NullObserver).expect("solves");

    assert!(
        outcome.reward > 0.9,
        "expected reward > 0.9 within 200 iterations, got {}",
        outcome.reward
    );
    let root_summary = &outcome.root_history[0];
    let branch_summary = root_summary.iter().find(|c| c.action_id == 1).expect("branch action present");
    let stop_summary = root_summary.iter().find(|c| c.action_id == 0).expect("stop action present");
    assert!(
        branch_summary.best_reward >= stop_summary.best_reward,
        "expected the branching rule to score at least as well as stopping immediately"
    );
}

#[test]
fn root_advancement_prunes_sibling_subtrees() {
    // Seed scenario 6 (`spec.md` §8): after a root advances, only the
    // winning branch's history should appear in subsequent root summaries
    // -- verified indirectly here by checking that every root-history entry
    // has at most the grammar's branching factor of children, i.e. no
    // leaked siblings accumulate across advancements.
    let grammar = presets::stochastic_branch();
    let rasterizer = LineRasterizer;
    let target_tree = DerivationTree::from_axiom(vec![Symbol::with_parameters(
        SymbolName::F,
        0,
        vec![1.0, 0.1],
    )]);
    let target = DerivationTarget::new(target_tree, rasterizer);

    let config = SolverConfig { grammar_id: GrammarId::StochasticBranch, ..base_config() };
    let outcome = solve(&grammar, &config, &rasterizer, &target, &mut NullObserver).expect("solves");

    for summary in &outcome.root_history {
        assert!(summary.len() <= 2, "stochastic_branch never offers more than two actions per root");
    }
}
