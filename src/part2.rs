use std::collections::HashSet;

use tracing::debug;

use crate::map::{Direction, Map, Position, OBSTACLE, TRIAL_OBSTACLE, VISITED};

/// Replays the guard's unobstructed patrol and counts the tiles where a
/// single added obstruction would trap it in a loop forever.
#[tracing::instrument]
pub fn process(input: &str) -> miette::Result<String> {
    let map = Map::parse(input)?;
    let start = map.guard_start()?;

    let mut guard = start;
    let mut direction = Direction::North;
    let mut loop_positions: HashSet<Position> = HashSet::new();

    while map.is_within_bounds(guard) {
        let next = guard.step(direction);

        if !map.is_within_bounds(next) {
            break;
        }

        if map.get(next) == Some(OBSTACLE) {
            direction = direction.turn_right();
        } else {
            // Trial run on an independent copy; the patrol always restarts
            // from the original start, not from the replay position.
            let mut trial = map.clone();
            trial.set(next, TRIAL_OBSTACLE);
            if patrol_loops(trial, start, Direction::North) {
                loop_positions.insert(next);
            }
            guard = next;
        }
    }

    debug!(count = loop_positions.len(), "trial obstructions that loop");

    Ok(loop_positions.len().to_string())
}

/// Walks the map from `start` and reports whether the patrol cycles.
///
/// A turn is recorded as (tile, facing before the turn); seeing the same
/// pair twice proves an unbounded cycle, so the walk stops right there.
fn patrol_loops(mut map: Map, start: Position, facing: Direction) -> bool {
    let mut guard = start;
    let mut direction = facing;
    let mut turns: HashSet<(Position, Direction)> = HashSet::new();

    while map.is_within_bounds(guard) {
        let next = guard.step(direction);

        if !map.is_within_bounds(next) {
            return false;
        }

        match map.get(next) {
            Some(OBSTACLE) | Some(TRIAL_OBSTACLE) => {
                if !turns.insert((guard, direction)) {
                    return true;
                }
                direction = direction.turn_right();
            }
            _ => {
                map.set(guard, VISITED);
                guard = next;
            }
        }
    }

    false
}
