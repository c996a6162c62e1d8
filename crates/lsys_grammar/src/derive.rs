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

//! Uniform-random derivation: pick a legal action at random and apply it.
//! This is the rollout policy `spec.md` §4.3 calls for beyond the expanded
//! MCTS node, and is also how `lsys_mcts` materializes a brand-new root.

use rand::Rng;

use lsys_core::action::Action;
use lsys_core::state::State;

use crate::enumerate::enumerate_actions;
use crate::grammar::Grammar;

/// Apply one uniformly-random legal action to `state`, if any remain.
/// Returns the applied action, or `None` when the head symbol offers no
/// actions at all (the derivation stops on this branch without completing,
/// per `crate::enumerate`'s contract).
pub fn step(grammar: &Grammar, state: &mut State, rng: &mut impl Rng) -> Option<Action> {
    if state.is_complete() {
        return None;
    }
    let actions = enumerate_actions(grammar, state);
    if actions.is_empty() {
        return None;
    }
    let choice = rng.gen_range(0..actions.len());
    let action = actions[choice].clone();
    state.apply_action(&action);
    Some(action)
}

/// Drive `state` to completion (or a dead end) with uniformly-random
/// choices at every step, for at most `max_steps` derivation steps. This is
/// the rollout policy proper: `lsys_mcts` calls it from an expanded node to
/// score a simulation.
pub fn random_rollout(grammar: &Grammar, state: &mut State, max_steps: u32, rng: &mut impl Rng) {
    for _ in 0..max_steps {
        if step(grammar, state, rng).is_none() {
            break;
        }
    }
}

/// Like [`random_rollout`], but also records the sequence of applied
/// actions — the "derivation history" `spec.md` §4.3 requires to support
/// best-reward re-materialization: a winning rollout's action trajectory is
/// promoted into persistent search-tree children after the fact, which
/// requires knowing exactly which actions, in order, produced it.
pub fn random_rollout_history(
    grammar: &Grammar,
    state: &mut State,
    max_steps: u32,
    rng: &mut impl Rng,
) -> Vec<Action> {
    let mut history = Vec::new();
    for _ in 0..max_steps {
        match step(grammar, state, rng) {
            Some(action) => history.push(action),
            None => break,
        }
    }
    history
}
