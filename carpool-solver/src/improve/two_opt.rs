//! Intra-route 2-opt: reverse a contiguous run of stops.
//!
//! Matrices may be asymmetric, so the reversed run is re-costed in the
//! backward direction rather than assumed unchanged.

use carpool_core::{Route, RoutingProblem, Solution};

use crate::cost::{Delta, arc};

/// Reversal of the stops between `from` and `to` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TwoOpt {
    pub(super) vehicle: usize,
    pub(super) from: usize,
    pub(super) to: usize,
    pub(super) delta: Delta,
}

/// First improving reversal, scanning vehicles then segment start and end.
pub(super) fn find(problem: &RoutingProblem, solution: &Solution) -> Option<TwoOpt> {
    solution
        .routes()
        .iter()
        .find_map(|route| find_in_route(problem, route))
}

fn find_in_route(problem: &RoutingProblem, route: &Route) -> Option<TwoOpt> {
    let len = route.len();
    for from in 0..len {
        // Full-sequence positions are offset by one for the origin.
        let before = route.node_at(problem, from);
        let first = route.node_at(problem, from + 1);
        let mut forward: Delta = 0;
        let mut backward: Delta = 0;
        let mut previous = first;
        for to in (from + 1)..len {
            let last = route.node_at(problem, to + 1);
            let after = route.node_at(problem, to + 2);
            forward += arc(problem, previous, last);
            backward += arc(problem, last, previous);
            previous = last;

            let current = arc(problem, before, first) + forward + arc(problem, last, after);
            let reversed = arc(problem, before, last) + backward + arc(problem, first, after);
            let delta = reversed - current;
            if delta < 0 {
                return Some(TwoOpt {
                    vehicle: route.vehicle(),
                    from,
                    to,
                    delta,
                });
            }
        }
    }
    None
}

/// Apply `step` to `solution`.
pub(super) fn apply(solution: &mut Solution, step: TwoOpt) {
    if let Some(route) = solution.route_mut(step.vehicle) {
        route.reverse(step.from, step.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::line_problem;
    use rstest::rstest;

    #[rstest]
    fn untangles_a_crossed_route() {
        // Origin 0, destination 10, stops visited 6 then 3.
        let problem = line_problem(&[0], &[6, 3], 10, 2);
        let mut solution = Solution::from_routes(&problem, vec![Route::new(0, vec![0, 1])]);
        let step = find(&problem, &solution).expect("improving reversal");
        assert_eq!((step.from, step.to, step.delta), (0, 1, -6));
        apply(&mut solution, step);
        solution.recompute_total(&problem);
        assert_eq!(solution.route(0).map(Route::stops), Some(&[1, 0][..]));
        assert_eq!(solution.total_distance(), 10);
    }

    #[rstest]
    fn ordered_route_has_no_reversal() {
        let problem = line_problem(&[0], &[3, 6, 8], 10, 3);
        let solution = Solution::from_routes(&problem, vec![Route::new(0, vec![0, 1, 2])]);
        assert_eq!(find(&problem, &solution), None);
    }

    #[rstest]
    fn asymmetric_costs_are_respected() {
        let problem = carpool_core::RoutingProblem::build(
            vec![carpool_core::Vehicle::new("v", "O", 2)],
            vec![
                carpool_core::Stop::new("a", "A"),
                carpool_core::Stop::new("b", "B"),
            ],
            Some(carpool_core::Location::new("d", "D")),
            // O->A->B->D costs 1+9+1; O->B->A->D costs 1+1+1.
            &[
                vec![0, 1, 1, 5],
                vec![1, 0, 9, 1],
                vec![1, 1, 0, 1],
                vec![5, 1, 1, 0],
            ],
        )
        .expect("valid problem");
        let solution = Solution::from_routes(&problem, vec![Route::new(0, vec![0, 1])]);
        let step = find(&problem, &solution).expect("improving reversal");
        assert_eq!(step.delta, -8);
    }
}
