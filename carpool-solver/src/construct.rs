//! Cheapest-insertion construction with capacity gating.
//!
//! Every vehicle starts with an empty route. Each step scans all
//! (vehicle, unplaced stop, position) triples and commits the insertion with
//! the smallest distance increase. Scanning vehicles in order, then stops in
//! order, then positions in order, and only replacing the incumbent on a
//! strictly smaller delta, breaks ties towards the lowest vehicle and then
//! the lowest stop.

use carpool_core::{RoutingProblem, SolveError, Solution, Stop};
use thiserror::Error;

use crate::cost::{Delta, has_spare_seat, insertion_delta};

/// Errors returned by [`construct`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// Every vehicle is full but stops remain unplaced.
    #[error("no vehicle has spare capacity for stop {stop}")]
    NoFeasibleAssignment {
        /// Identifier of the first stop left unplaced.
        stop: String,
    },
}

impl From<ConstructionError> for SolveError {
    fn from(err: ConstructionError) -> Self {
        match err {
            ConstructionError::NoFeasibleAssignment { stop } => {
                Self::NoFeasibleAssignment { stop }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Insertion {
    vehicle: usize,
    stop: usize,
    position: usize,
    delta: Delta,
}

/// Build an initial capacity-respecting solution.
///
/// # Errors
///
/// Returns [`ConstructionError::NoFeasibleAssignment`] when the fleet runs
/// out of seats. [`RoutingProblem::build`] already rejects such problems, but
/// problems assembled with [`RoutingProblem::from_parts`] are not checked.
///
/// # Examples
/// ```
/// use carpool_core::{Location, RoutingProblem, Stop, Vehicle};
/// use carpool_solver::construct;
///
/// let problem = RoutingProblem::build(
///     vec![Vehicle::new("car", "Home", 2)],
///     vec![Stop::new("far", "Far"), Stop::new("near", "Near")],
///     Some(Location::new("work", "Work")),
///     &[
///         vec![0, 8, 2, 10],
///         vec![8, 0, 6, 2],
///         vec![2, 6, 0, 8],
///         vec![10, 2, 8, 0],
///     ],
/// )?;
/// let solution = construct(&problem)?;
/// assert_eq!(solution.routes()[0].stops(), &[1, 0]);
/// assert_eq!(solution.total_distance(), 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn construct(problem: &RoutingProblem) -> Result<Solution, ConstructionError> {
    let mut solution = Solution::empty(problem);
    let mut unplaced: Vec<usize> = (0..problem.stops().len()).collect();

    while !unplaced.is_empty() {
        let insertion = cheapest_feasible_insertion(problem, &solution, &unplaced)
            .ok_or_else(|| no_feasible_assignment(problem, &unplaced))?;
        if let Some(route) = solution.route_mut(insertion.vehicle) {
            route.insert(insertion.position, insertion.stop);
        }
        unplaced.retain(|&stop| stop != insertion.stop);
        log::trace!(
            "inserted stop {} into vehicle {} at {} (delta {})",
            insertion.stop,
            insertion.vehicle,
            insertion.position,
            insertion.delta
        );
    }

    solution.recompute_total(problem);
    debug_assert!(
        solution.validate(problem).is_ok(),
        "construction produced an invalid solution"
    );
    log::debug!(
        "constructed {} routes with total distance {}",
        solution.routes().len(),
        solution.total_distance()
    );
    Ok(solution)
}

fn cheapest_feasible_insertion(
    problem: &RoutingProblem,
    solution: &Solution,
    unplaced: &[usize],
) -> Option<Insertion> {
    let mut best: Option<Insertion> = None;
    for route in solution
        .routes()
        .iter()
        .filter(|route| has_spare_seat(problem, route))
    {
        for &stop in unplaced {
            for position in 0..=route.len() {
                let delta = insertion_delta(problem, route, position, stop);
                if best.is_none_or(|incumbent| delta < incumbent.delta) {
                    best = Some(Insertion {
                        vehicle: route.vehicle(),
                        stop,
                        position,
                        delta,
                    });
                }
            }
        }
    }
    best
}

fn no_feasible_assignment(problem: &RoutingProblem, unplaced: &[usize]) -> ConstructionError {
    let stop = unplaced
        .first()
        .and_then(|&stop| problem.stops().get(stop))
        .map(Stop::id)
        .unwrap_or_default()
        .to_owned();
    log::debug!("construction stalled with {} stops unplaced", unplaced.len());
    ConstructionError::NoFeasibleAssignment { stop }
}
