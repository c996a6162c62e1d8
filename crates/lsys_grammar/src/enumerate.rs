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

//! The action enumerator of `spec.md` §4.2: given a grammar and a state,
//! the finite set of legal next moves for the symbol at the head of the
//! pending queue.

use lsys_core::action::Action;
use lsys_core::config::GrammarId;
use lsys_core::state::State;
use lsys_core::symbol::{Symbol, SymbolName};

use crate::grammar::Grammar;

/// Enumerate the legal actions for the symbol at `state.head()`.
///
/// Infallible by construction (`spec.md` §7): a state with no pending
/// symbol, or whose head's own rules produce no actions (the
/// `X`-below-minimum-length case `SPEC_FULL.md` §4 carries over from the
/// original source), both yield an empty vector rather than an error —
/// callers treat that as "this branch of the derivation stops here."
pub fn enumerate_actions(grammar: &Grammar, state: &State) -> Vec<Action> {
    let Some(slot) = state.head() else {
        return Vec::new();
    };
    let symbol = state
        .tree()
        .get(slot)
        .expect("a pending queue index always refers to a live symbol in the tree");

    if symbol.awaits_rule() {
        return enumerate_rules(grammar, slot, symbol);
    }
    if symbol.awaits_value() {
        return enumerate_values(grammar, slot, symbol);
    }
    if symbol.name.is_drawable() && !symbol.parameters_defined {
        return enumerate_drawable_values(grammar, slot);
    }

    unreachable!(
        "pending symbol {:?} at slot {slot} accepts neither a rule nor a value action \
         — a grammar left a symbol pending with no applicable action kind",
        symbol.name
    )
}

fn enumerate_rules(grammar: &Grammar, slot: usize, symbol: &Symbol) -> Vec<Action> {
    match grammar.id {
        GrammarId::SimpleTree => simple_tree_rules(slot, symbol),
        GrammarId::StochasticBranch => stochastic_branch_rules(slot, symbol),
        GrammarId::ParametricBranch => parametric_branch_rules(grammar, slot, symbol),
    }
}

fn simple_tree_rules(slot: usize, symbol: &Symbol) -> Vec<Action> {
    let depth = symbol.depth + 1;
    let stop = vec![Symbol::with_parameters(SymbolName::F, depth, vec![1.0, 0.1])];
    let branch = vec![
        Symbol::with_parameters(SymbolName::F, depth, vec![1.0, 0.1]),
        Symbol::structural(SymbolName::Push, depth),
        Symbol::pending(SymbolName::Minus, depth),
        Symbol::pending(SymbolName::X, depth),
        Symbol::structural(SymbolName::Pop, depth),
        Symbol::structural(SymbolName::Push, depth),
        Symbol::pending(SymbolName::Plus, depth),
        Symbol::pending(SymbolName::X, depth),
        Symbol::structural(SymbolName::Pop, depth),
    ];
    vec![Action::rule(0, slot, stop), Action::rule(1, slot, branch)]
}

fn stochastic_branch_rules(slot: usize, symbol: &Symbol) -> Vec<Action> {
    let depth = symbol.depth + 1;
    let stop = vec![Symbol::with_parameters(SymbolName::F, depth, vec![1.0, 0.1])];
    let extend = vec![
        Symbol::with_parameters(SymbolName::F, depth, vec![1.0, 0.1]),
        Symbol::pending(SymbolName::X, depth),
    ];
    vec![Action::rule(0, slot, stop), Action::rule(1, slot, extend)]
}

/// `X` carries `[next_segment_length, next_segment_radius,
/// accumulated_length]`. Culling order follows `spec.md` §4.1 exactly:
/// accumulated length first, then the base-part threshold, then the
/// branch-depth cap.
fn parametric_branch_rules(grammar: &Grammar, slot: usize, symbol: &Symbol) -> Vec<Action> {
    let length = symbol.parameters[0];
    let radius = symbol.parameters[1];
    let accumulated = symbol.parameters[2];
    let depth = symbol.depth + 1;

    if length < 1e-6 {
        return Vec::new();
    }

    let stop = Action::rule(0, slot, vec![Symbol::with_parameters(SymbolName::F, depth, vec![length, radius])]);

    if accumulated > grammar.max_accumulated_length {
        return vec![stop];
    }

    let extend = Action::rule(
        1,
        slot,
        vec![
            Symbol::with_parameters(SymbolName::F, depth, vec![length, radius]),
            Symbol::pending(SymbolName::Backslash, depth),
            Symbol::pending(SymbolName::Hash, depth),
            Symbol::with_parameters(
                SymbolName::X,
                depth,
                vec![length * grammar.extend_length_mult, radius * grammar.radius_shrink, accumulated + length],
            ),
        ],
    );

    if length < grammar.base_part_threshold {
        return vec![extend];
    }

    let mut actions = vec![stop, extend];

    if symbol.depth < grammar.max_branch_depth {
        let branch_length = length * grammar.branch_length_mult;
        let branch = Action::rule(
            2,
            slot,
            vec![
                Symbol::with_parameters(SymbolName::F, depth, vec![branch_length, radius]),
                Symbol::structural(SymbolName::Push, depth),
                Symbol::pending(SymbolName::Plus, depth),
                Symbol::with_parameters(
                    SymbolName::X,
                    depth,
                    vec![
                        branch_length * grammar.extend_length_mult,
                        radius * grammar.radius_shrink,
                        accumulated + branch_length,
                    ],
                ),
                Symbol::structural(SymbolName::Pop, depth),
                Symbol::with_parameters(
                    SymbolName::F,
                    depth,
                    vec![branch_length * grammar.extend_length_mult, radius * grammar.radius_shrink],
                ),
                Symbol::pending(SymbolName::Backslash, depth),
                Symbol::pending(SymbolName::Hash, depth),
                Symbol::with_parameters(
                    SymbolName::X,
                    depth,
                    vec![
                        branch_length * grammar.extend_length_mult,
                        radius * grammar.radius_shrink,
                        accumulated + branch_length,
                    ],
                ),
            ],
        );
        actions.push(branch);
    }

    actions
}

fn enumerate_values(grammar: &Grammar, slot: usize, symbol: &Symbol) -> Vec<Action> {
    let grid: &[f64] = match symbol.name {
        SymbolName::Plus | SymbolName::Minus | SymbolName::Slash => &grammar.angle_grid_degrees,
        SymbolName::Hash => &grammar.hash_grid_degrees,
        // Narrowed per `SPEC_FULL.md` §4: the roll symbol takes a single
        // fixed value rather than a discretized grid.
        SymbolName::Backslash => return vec![Action::value(0, slot, 180.0)],
        SymbolName::X | SymbolName::F | SymbolName::Push | SymbolName::Pop => unreachable!(
            "enumerate_values called on a non-angle symbol"
        ),
    };
    let sign = if symbol.name == SymbolName::Minus { -1.0 } else { 1.0 };
    grid.iter()
        .enumerate()
        .map(|(id, degrees)| Action::value(id as u32, slot, sign * degrees))
        .collect()
}

fn enumerate_drawable_values(grammar: &Grammar, slot: usize) -> Vec<Action> {
    grammar
        .length_value_multipliers
        .iter()
        .enumerate()
        .map(|(id, multiplier)| Action::value(id as u32, slot, multiplier * grammar.length_value_mean))
        .collect()
}
