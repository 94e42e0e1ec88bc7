//! Greedy rollout of a frozen value model into a concrete route

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};

use super::policy::{self, ActionValues};
use crate::{
    gridworld::Environment,
    types::{Action, Cell},
};

/// Default iteration cap for [`extract_path`].
pub const DEFAULT_MAX_PATH_STEPS: usize = 300;

/// Follow the greedy policy of `model` from `start` towards the target.
///
/// Each iteration records the current cell and moves greedily. A greedy move
/// that bumps into a wall or the edge is replaced by the first action, in a
/// shuffled order drawn from `rng`, that actually moves; if none does the
/// agent is boxed in and the rollout stops. It also stops on reaching the
/// target (which is included), on revisiting a cell, or after `max_steps`
/// iterations, so the result never exceeds `max_steps + 1` cells.
///
/// An empty result means the environment has no target. Callers should treat
/// anything of length ≤ 1 as "no usable path".
pub fn extract_path<M, R>(
    env: &Environment,
    model: &M,
    start: Cell,
    max_steps: usize,
    rng: &mut R,
) -> Vec<Cell>
where
    M: ActionValues + ?Sized,
    R: Rng + ?Sized,
{
    let Some(target) = env.target() else {
        return Vec::new();
    };

    let mut path = Vec::new();
    let mut visited = HashSet::from([start]);
    let mut pos = start;

    for _ in 0..max_steps {
        path.push(pos);
        if pos == target {
            break;
        }

        let greedy = env.transition(pos, policy::greedy_action(model, pos));
        let next = if greedy != pos {
            greedy
        } else {
            match unstick(env, pos, rng) {
                Some(next) => next,
                None => break,
            }
        };
        pos = next;

        if pos == target {
            path.push(pos);
            break;
        }
        if !visited.insert(pos) {
            break;
        }
    }
    path
}

/// First action in a random order that moves the agent off `pos`.
fn unstick<R: Rng + ?Sized>(env: &Environment, pos: Cell, rng: &mut R) -> Option<Cell> {
    let mut order = Action::ALL;
    order.shuffle(rng);
    order
        .into_iter()
        .map(|action| env.transition(pos, action))
        .find(|&next| next != pos)
}
