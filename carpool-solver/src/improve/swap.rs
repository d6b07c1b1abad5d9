//! Inter-route swap: exchange one stop between two vehicles.

use carpool_core::{RoutingProblem, Solution};

use crate::cost::{Delta, replacement_delta};

/// Exchange of `first`'s stop at `first_position` with `second`'s at
/// `second_position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Swap {
    pub(super) first: usize,
    pub(super) first_position: usize,
    pub(super) second: usize,
    pub(super) second_position: usize,
    pub(super) delta: Delta,
}

/// First swap that strictly shortens the two routes combined.
///
/// Loads are unchanged so capacity always holds.
pub(super) fn find(problem: &RoutingProblem, solution: &Solution) -> Option<Swap> {
    let routes = solution.routes();
    for (index, first) in routes.iter().enumerate() {
        for second in routes.iter().skip(index + 1) {
            for (first_position, &first_stop) in first.stops().iter().enumerate() {
                for (second_position, &second_stop) in second.stops().iter().enumerate() {
                    let delta = replacement_delta(problem, first, first_position, second_stop)
                        + replacement_delta(problem, second, second_position, first_stop);
                    if delta < 0 {
                        return Some(Swap {
                            first: first.vehicle(),
                            first_position,
                            second: second.vehicle(),
                            second_position,
                            delta,
                        });
                    }
                }
            }
        }
    }
    None
}

/// Apply `step` to `solution`.
pub(super) fn apply(solution: &mut Solution, step: Swap) {
    let incoming = solution
        .route(step.second)
        .and_then(|route| route.stops().get(step.second_position).copied());
    let Some(incoming_stop) = incoming else {
        return;
    };
    let outgoing = solution
        .route_mut(step.first)
        .and_then(|route| route.replace(step.first_position, incoming_stop));
    if let (Some(outgoing_stop), Some(route)) = (outgoing, solution.route_mut(step.second)) {
        route.replace(step.second_position, outgoing_stop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_problem;
    use carpool_core::Route;
    use rstest::rstest;

    #[rstest]
    fn exchanges_stops_held_by_the_wrong_vehicles() {
        // Each vehicle holds the stop next to the other vehicle.
        let problem = line_problem(&[0, 20], &[19, 1], 10, 1);
        let mut solution = Solution::from_routes(
            &problem,
            vec![Route::new(0, vec![0]), Route::new(1, vec![1])],
        );
        let before = solution.total_distance();
        let step = find(&problem, &solution).expect("improving swap");
        apply(&mut solution, step);
        solution.recompute_total(&problem);
        assert_eq!(solution.route(0).map(Route::stops), Some(&[1][..]));
        assert_eq!(solution.route(1).map(Route::stops), Some(&[0][..]));
        assert_eq!(
            i128::from(solution.total_distance()) - i128::from(before),
            step.delta
        );
        assert!(solution.validate(&problem).is_ok());
    }

    #[rstest]
    fn well_placed_stops_stay_put() {
        let problem = line_problem(&[0, 20], &[1, 19], 10, 1);
        let solution = Solution::from_routes(
            &problem,
            vec![Route::new(0, vec![0]), Route::new(1, vec![1])],
        );
        assert_eq!(find(&problem, &solution), None);
    }
}
