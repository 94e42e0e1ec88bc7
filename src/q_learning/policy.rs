//! Greedy and epsilon-greedy action selection over any action-value model

use rand::Rng;

use crate::types::{Action, Cell};

/// Read access to estimated action-values.
///
/// Implemented by the tabular [`QTable`](super::QTable) and the
/// [`LinearModel`](super::LinearModel) so selection and path extraction work
/// on either.
pub trait ActionValues {
    fn value(&self, cell: Cell, action: Action) -> f64;
}

/// Highest-valued action at `cell`.
///
/// Left fold over [`Action::ALL`] that only replaces the leader on a strictly
/// greater value, so ties go to the earliest action (UP first).
pub fn greedy_action<M: ActionValues + ?Sized>(model: &M, cell: Cell) -> Action {
    let [first, rest @ ..] = Action::ALL;
    rest.into_iter().fold(first, |best, action| {
        if model.value(cell, action) > model.value(cell, best) {
            action
        } else {
            best
        }
    })
}

/// Maximum action-value at `cell`; the bootstrap target for off-policy updates.
pub fn max_value<M: ActionValues + ?Sized>(model: &M, cell: Cell) -> f64 {
    Action::ALL
        .iter()
        .map(|&action| model.value(cell, action))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// ε-greedy action selection
///
/// With probability `epsilon` a uniformly random action, otherwise
/// [`greedy_action`]. No random number is drawn when `epsilon <= 0`.
pub fn select_action<M, R>(model: &M, cell: Cell, epsilon: f64, rng: &mut R) -> Action
where
    M: ActionValues + ?Sized,
    R: Rng + ?Sized,
{
    if epsilon > 0.0 && rng.random::<f64>() < epsilon {
        // Explore: random action
        Action::ALL[rng.random_range(0..Action::ALL.len())]
    } else {
        // Exploit: greedy action based on Q-values
        greedy_action(model, cell)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::q_learning::{LinearModel, QTable, linear::LinearWeights};

    #[test]
    fn test_all_equal_values_pick_up() {
        let qtable = QTable::new(3, 3);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..10 {
            assert_eq!(select_action(&qtable, Cell::new(1, 1), 0.0, &mut rng), Action::Up);
        }

        let mut qtable = QTable::new(3, 3);
        for action in Action::ALL {
            qtable.set(Cell::new(1, 1), action, 4.2);
        }
        assert_eq!(greedy_action(&qtable, Cell::new(1, 1)), Action::Up);
    }

    #[test]
    fn test_tie_keeps_earliest_leader() {
        let mut qtable = QTable::new(3, 3);
        let cell = Cell::new(1, 1);
        qtable.set(cell, Action::Right, 1.0);
        qtable.set(cell, Action::Left, 1.0);
        assert_eq!(greedy_action(&qtable, cell), Action::Right);

        qtable.set(cell, Action::Down, 1.5);
        assert_eq!(greedy_action(&qtable, cell), Action::Down);
        assert_eq!(max_value(&qtable, cell), 1.5);
    }

    #[test]
    fn test_linear_ties_also_pick_up() {
        let model = LinearModel::from_weights([LinearWeights::default(); 4]);
        assert_eq!(greedy_action(&model, Cell::new(2, 3)), Action::Up);
    }

    #[test]
    fn test_full_exploration_covers_every_action() {
        let qtable = QTable::new(3, 3);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[select_action(&qtable, Cell::new(1, 1), 1.0, &mut rng).index()] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_max_value_of_negative_row() {
        let mut qtable = QTable::new(2, 2);
        let cell = Cell::new(0, 0);
        for (action, value) in Action::ALL.into_iter().zip([-3.0, -1.0, -2.0, -5.0]) {
            qtable.set(cell, action, value);
        }
        assert_eq!(max_value(&qtable, cell), -1.0);
        assert_eq!(greedy_action(&qtable, cell), Action::Right);
    }
}
