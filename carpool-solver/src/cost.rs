//! Signed distance deltas shared by construction and local search.
//!
//! Deltas are `i128` so that sums and differences of `u64` distances never
//! overflow, and so that non-metric tables (where a detour can be shorter
//! than the direct arc) produce honest negative values.

use carpool_core::{NodeIndex, Route, RoutingProblem};

/// Signed change in distance caused by a move.
pub(crate) type Delta = i128;

/// Distance between two nodes as a [`Delta`].
pub(crate) fn arc(problem: &RoutingProblem, from: NodeIndex, to: NodeIndex) -> Delta {
    Delta::from(problem.distance(from, to))
}

/// Cost of placing `stop` so that it becomes the stop at `position`.
///
/// The arc `prev -> next` is replaced by `prev -> stop -> next`.
pub(crate) fn insertion_delta(
    problem: &RoutingProblem,
    route: &Route,
    position: usize,
    stop: usize,
) -> Delta {
    let prev = route.node_at(problem, position);
    let next = route.node_at(problem, position + 1);
    let node = problem.stop_node(stop);
    arc(problem, prev, node) + arc(problem, node, next) - arc(problem, prev, next)
}

/// Cheapest position for `stop` in `route`, lowest position on ties.
pub(crate) fn cheapest_insertion(
    problem: &RoutingProblem,
    route: &Route,
    stop: usize,
) -> (usize, Delta) {
    let mut best = (0, insertion_delta(problem, route, 0, stop));
    for position in 1..=route.len() {
        let delta = insertion_delta(problem, route, position, stop);
        if delta < best.1 {
            best = (position, delta);
        }
    }
    best
}

/// Distance saved by removing the stop at `position`.
pub(crate) fn removal_gain(problem: &RoutingProblem, route: &Route, position: usize) -> Delta {
    let prev = route.node_at(problem, position);
    let node = route.node_at(problem, position + 1);
    let next = route.node_at(problem, position + 2);
    arc(problem, prev, node) + arc(problem, node, next) - arc(problem, prev, next)
}

/// Change in route distance if the stop at `position` were replaced by `stop`.
pub(crate) fn replacement_delta(
    problem: &RoutingProblem,
    route: &Route,
    position: usize,
    stop: usize,
) -> Delta {
    let prev = route.node_at(problem, position);
    let current = route.node_at(problem, position + 1);
    let next = route.node_at(problem, position + 2);
    let incoming = problem.stop_node(stop);
    arc(problem, prev, incoming) + arc(problem, incoming, next)
        - arc(problem, prev, current)
        - arc(problem, current, next)
}

/// Whether `route` can take one more passenger.
pub(crate) fn has_spare_seat(problem: &RoutingProblem, route: &Route) -> bool {
    u64::try_from(route.len()).unwrap_or(u64::MAX) < u64::from(problem.capacity(route.vehicle()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_problem;
    use rstest::rstest;

    #[rstest]
    fn insertion_into_empty_route_replaces_direct_arc() {
        // Origin at 0, stop at 2, destination at 5 on a line.
        let problem = line_problem(&[0], &[2], 5, 1);
        let route = Route::empty(0);
        assert_eq!(insertion_delta(&problem, &route, 0, 0), 0);
    }

    #[rstest]
    fn detours_cost_twice_the_overshoot() {
        let problem = line_problem(&[0], &[7], 5, 1);
        let route = Route::empty(0);
        assert_eq!(cheapest_insertion(&problem, &route, 0), (0, 4));
    }

    #[rstest]
    fn removal_gain_mirrors_insertion() {
        let problem = line_problem(&[0], &[7, 3], 5, 2);
        let route = Route::new(0, vec![1, 0]);
        assert_eq!(removal_gain(&problem, &route, 1), 4);
        assert_eq!(removal_gain(&problem, &route, 0), 0);
    }

    #[rstest]
    fn replacement_accounts_for_both_neighbours() {
        // Two single-seat vehicles so the fleet covers both stops.
        let problem = line_problem(&[0, 0], &[7, 3], 5, 1);
        let route = Route::new(0, vec![0]);
        assert_eq!(replacement_delta(&problem, &route, 0, 1), -4);
        assert!(!has_spare_seat(&problem, &route));
        assert!(has_spare_seat(&problem, &Route::empty(0)));
    }
}
