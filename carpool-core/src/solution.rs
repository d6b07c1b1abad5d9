//! Vehicle routes and complete solutions.
//!
//! A [`Route`] stores only the stops a vehicle serves; its origin and the
//! shared destination are implied by the owning vehicle and the problem, so
//! a route can never lose its endpoints. A [`Solution`] owns one route per
//! vehicle, keyed by vehicle position.

use thiserror::Error;

use crate::{Distance, NodeIndex, RoutingProblem};

/// Ordered stops served by one vehicle.
///
/// # Examples
/// ```
/// use carpool_core::Route;
///
/// let mut route = Route::empty(0);
/// route.insert(0, 3);
/// route.insert(0, 1);
/// assert_eq!(route.stops(), &[1, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    vehicle: usize,
    stops: Vec<usize>,
}

impl Route {
    /// A route driving straight from origin to destination.
    #[must_use]
    pub const fn empty(vehicle: usize) -> Self {
        Self {
            vehicle,
            stops: Vec::new(),
        }
    }

    /// A route visiting `stops` (stop positions) in order.
    #[must_use]
    pub const fn new(vehicle: usize, stops: Vec<usize>) -> Self {
        Self { vehicle, stops }
    }

    /// Position of the owning vehicle.
    #[must_use]
    pub const fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Stop positions in visiting order.
    #[must_use]
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Number of stops served.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the route serves no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Insert `stop` so it becomes the stop at `position`.
    ///
    /// Positions past the end append.
    pub fn insert(&mut self, position: usize, stop: usize) {
        let position = position.min(self.stops.len());
        self.stops.insert(position, stop);
    }

    /// Remove and return the stop at `position`.
    pub fn remove(&mut self, position: usize) -> Option<usize> {
        (position < self.stops.len()).then(|| self.stops.remove(position))
    }

    /// Replace the stop at `position`, returning the previous one.
    pub fn replace(&mut self, position: usize, stop: usize) -> Option<usize> {
        self.stops
            .get_mut(position)
            .map(|slot| std::mem::replace(slot, stop))
    }

    /// Reverse the stops between `from` and `to`, both inclusive.
    pub fn reverse(&mut self, from: usize, to: usize) {
        if let Some(segment) = self.stops.get_mut(from..=to) {
            segment.reverse();
        }
    }

    /// Node at `position` of the full sequence `origin, stops.., destination`.
    ///
    /// Position `0` is the origin and `len() + 1` the destination.
    #[must_use]
    pub fn node_at(&self, problem: &RoutingProblem, position: usize) -> NodeIndex {
        if position == 0 {
            return problem.origin_node(self.vehicle);
        }
        self.stops
            .get(position - 1)
            .map_or_else(|| problem.destination_node(), |&stop| problem.stop_node(stop))
    }

    /// The full node sequence: origin, stops, destination.
    pub fn nodes<'a>(&'a self, problem: &'a RoutingProblem) -> impl Iterator<Item = NodeIndex> + 'a {
        std::iter::once(problem.origin_node(self.vehicle))
            .chain(self.stops.iter().map(|&stop| problem.stop_node(stop)))
            .chain(std::iter::once(problem.destination_node()))
    }

    /// Total driven distance from origin to destination.
    #[must_use]
    pub fn distance(&self, problem: &RoutingProblem) -> Distance {
        let mut previous = problem.origin_node(self.vehicle);
        let total = self.nodes(problem).skip(1).try_fold(0, |total: Distance, node| {
            let arc = problem.distance(previous, node);
            previous = node;
            total.checked_add(arc)
        });
        total.unwrap_or_else(|| overflowed("route"))
    }
}

/// Structural rule broken by a [`Solution`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolutionViolation {
    /// The solution does not hold exactly one route per vehicle.
    #[error("expected {expected} routes, found {actual}")]
    RouteCount {
        /// Vehicles in the problem.
        expected: usize,
        /// Routes in the solution.
        actual: usize,
    },
    /// A route is stored under the wrong vehicle.
    #[error("route at position {position} belongs to vehicle {vehicle}")]
    RouteOwner {
        /// Slot in the solution.
        position: usize,
        /// Vehicle recorded on the route.
        vehicle: usize,
    },
    /// A route references a stop outside the problem.
    #[error("stop {stop} does not exist")]
    UnknownStop {
        /// Offending stop position.
        stop: usize,
    },
    /// A stop is visited more than once.
    #[error("stop {stop} is visited more than once")]
    DuplicateStop {
        /// Offending stop position.
        stop: usize,
    },
    /// A stop is not visited at all.
    #[error("stop {stop} is not visited")]
    MissingStop {
        /// Offending stop position.
        stop: usize,
    },
    /// A vehicle serves more stops than it has seats.
    #[error("vehicle {vehicle} serves {load} stops but has capacity {capacity}")]
    CapacityExceeded {
        /// Vehicle position.
        vehicle: usize,
        /// Stops served.
        load: usize,
        /// Seats available.
        capacity: u32,
    },
    /// The cached total disagrees with the routes.
    #[error("recorded total distance {recorded} differs from actual {actual}")]
    TotalMismatch {
        /// Cached value.
        recorded: Distance,
        /// Recomputed value.
        actual: Distance,
    },
}

/// One route per vehicle plus the aggregate distance.
///
/// # Examples
/// ```
/// use carpool_core::{Location, RoutingProblem, Solution, Vehicle};
///
/// let problem = RoutingProblem::build(
///     vec![Vehicle::new("a", "A", 1), Vehicle::new("b", "B", 1)],
///     Vec::new(),
///     Some(Location::new("d", "D")),
///     &[vec![0, 1, 4], vec![1, 0, 6], vec![4, 6, 0]],
/// )?;
/// let solution = Solution::empty(&problem);
/// assert_eq!(solution.total_distance(), 10);
/// assert!(solution.validate(&problem).is_ok());
/// # Ok::<(), carpool_core::ProblemError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    routes: Vec<Route>,
    total_distance: Distance,
}

impl Solution {
    /// Every vehicle drives directly to the destination.
    #[must_use]
    pub fn empty(problem: &RoutingProblem) -> Self {
        let routes = (0..problem.vehicles().len()).map(Route::empty).collect();
        Self::from_routes(problem, routes)
    }

    /// Wrap `routes`, computing the total distance.
    #[must_use]
    pub fn from_routes(problem: &RoutingProblem, routes: Vec<Route>) -> Self {
        let total_distance = sum_distances(problem, &routes);
        Self {
            routes,
            total_distance,
        }
    }

    /// Routes keyed by vehicle position.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The route of the vehicle at `vehicle`.
    #[must_use]
    pub fn route(&self, vehicle: usize) -> Option<&Route> {
        self.routes.get(vehicle)
    }

    /// Mutable access to a route.
    ///
    /// Callers must follow edits with [`Solution::recompute_total`].
    pub fn route_mut(&mut self, vehicle: usize) -> Option<&mut Route> {
        self.routes.get_mut(vehicle)
    }

    /// Aggregate distance over all routes.
    #[must_use]
    pub const fn total_distance(&self) -> Distance {
        self.total_distance
    }

    /// Refresh the cached total after route edits.
    pub fn recompute_total(&mut self, problem: &RoutingProblem) {
        self.total_distance = sum_distances(problem, &self.routes);
    }

    /// Check coverage, uniqueness, capacity and the cached total.
    ///
    /// # Errors
    ///
    /// Returns the first [`SolutionViolation`] found.
    pub fn validate(&self, problem: &RoutingProblem) -> Result<(), SolutionViolation> {
        if self.routes.len() != problem.vehicles().len() {
            return Err(SolutionViolation::RouteCount {
                expected: problem.vehicles().len(),
                actual: self.routes.len(),
            });
        }
        let mut visited = vec![false; problem.stops().len()];
        for (position, route) in self.routes.iter().enumerate() {
            if route.vehicle() != position {
                return Err(SolutionViolation::RouteOwner {
                    position,
                    vehicle: route.vehicle(),
                });
            }
            let capacity = problem.capacity(position);
            if route.len() > capacity as usize {
                return Err(SolutionViolation::CapacityExceeded {
                    vehicle: position,
                    load: route.len(),
                    capacity,
                });
            }
            for &stop in route.stops() {
                let slot = visited
                    .get_mut(stop)
                    .ok_or(SolutionViolation::UnknownStop { stop })?;
                if *slot {
                    return Err(SolutionViolation::DuplicateStop { stop });
                }
                *slot = true;
            }
        }
        if let Some(stop) = visited.iter().position(|seen| !seen) {
            return Err(SolutionViolation::MissingStop { stop });
        }
        let actual = sum_distances(problem, &self.routes);
        if actual != self.total_distance {
            return Err(SolutionViolation::TotalMismatch {
                recorded: self.total_distance,
                actual,
            });
        }
        Ok(())
    }
}

fn sum_distances(problem: &RoutingProblem, routes: &[Route]) -> Distance {
    routes
        .iter()
        .try_fold(0, |total: Distance, route| total.checked_add(route.distance(problem)))
        .unwrap_or_else(|| overflowed("solution"))
}

/// [`RoutingProblem::from_parts`] bounds every total, so this is unreachable
/// for problems it accepted.
fn overflowed(what: &str) -> Distance {
    log::warn!("{what} distance overflowed");
    debug_assert!(false, "{what} distance overflowed");
    Distance::MAX
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Location, Stop, Vehicle};
    use rstest::{fixture, rstest};

    /// Two vehicles (capacity 1 and 2), three stops, destination last.
    #[fixture]
    fn problem() -> RoutingProblem {
        RoutingProblem::build(
            vec![Vehicle::new("a", "A", 1), Vehicle::new("b", "B", 2)],
            vec![
                Stop::new("s0", "S0"),
                Stop::new("s1", "S1"),
                Stop::new("s2", "S2"),
            ],
            Some(Location::new("d", "D")),
            &[
                vec![0, 9, 1, 9, 9, 5],
                vec![9, 0, 9, 2, 3, 6],
                vec![1, 9, 0, 9, 9, 4],
                vec![9, 2, 9, 0, 1, 7],
                vec![9, 3, 9, 1, 0, 3],
                vec![5, 6, 4, 7, 3, 0],
            ],
        )
        .expect("valid problem")
    }

    #[rstest]
    fn route_distance_includes_both_endpoints(problem: RoutingProblem) {
        let route = Route::new(1, vec![1, 2]);
        // B -> s1 (2) -> s2 (1) -> D (3)
        assert_eq!(route.distance(&problem), 6);
        let nodes: Vec<usize> = route.nodes(&problem).map(NodeIndex::get).collect();
        assert_eq!(nodes, vec![1, 3, 4, 5]);
        assert_eq!(route.node_at(&problem, 0), problem.origin_node(1));
        assert_eq!(route.node_at(&problem, 3), problem.destination_node());
    }

    #[rstest]
    fn complete_solution_validates(problem: RoutingProblem) {
        let solution =
            Solution::from_routes(&problem, vec![Route::new(0, vec![0]), Route::new(1, vec![1, 2])]);
        assert_eq!(solution.total_distance(), 5 + 6);
        assert_eq!(solution.validate(&problem), Ok(()));
    }

    #[rstest]
    fn missing_stop_is_detected(problem: RoutingProblem) {
        let solution =
            Solution::from_routes(&problem, vec![Route::new(0, vec![0]), Route::new(1, vec![1])]);
        assert_eq!(
            solution.validate(&problem),
            Err(SolutionViolation::MissingStop { stop: 2 })
        );
    }

    #[rstest]
    fn duplicate_stop_is_detected(problem: RoutingProblem) {
        let solution = Solution::from_routes(
            &problem,
            vec![Route::new(0, vec![0]), Route::new(1, vec![0, 1])],
        );
        assert_eq!(
            solution.validate(&problem),
            Err(SolutionViolation::DuplicateStop { stop: 0 })
        );
    }

    #[rstest]
    fn capacity_overflow_is_detected(problem: RoutingProblem) {
        let solution = Solution::from_routes(
            &problem,
            vec![Route::new(0, vec![0, 1]), Route::new(1, vec![2])],
        );
        assert_eq!(
            solution.validate(&problem),
            Err(SolutionViolation::CapacityExceeded {
                vehicle: 0,
                load: 2,
                capacity: 1
            })
        );
    }

    #[rstest]
    fn stale_total_is_detected(problem: RoutingProblem) {
        let mut solution =
            Solution::from_routes(&problem, vec![Route::new(0, vec![0]), Route::new(1, vec![1, 2])]);
        if let Some(route) = solution.route_mut(1) {
            route.reverse(0, 1);
        }
        assert!(matches!(
            solution.validate(&problem),
            Err(SolutionViolation::TotalMismatch { .. })
        ));
        solution.recompute_total(&problem);
        assert_eq!(solution.validate(&problem), Ok(()));
    }

    #[rstest]
    fn route_edits_keep_order() {
        let mut route = Route::new(0, vec![4, 5, 6, 7]);
        route.reverse(1, 3);
        assert_eq!(route.stops(), &[4, 7, 6, 5]);
        assert_eq!(route.replace(0, 9), Some(4));
        assert_eq!(route.remove(3), Some(5));
        assert_eq!(route.remove(8), None);
        route.insert(10, 1);
        assert_eq!(route.stops(), &[9, 7, 6, 1]);
    }

    #[rstest]
    fn largest_accepted_totals_are_exact() {
        let far = i64::MAX;
        let problem = RoutingProblem::build(
            vec![Vehicle::new("v", "Home", 1)],
            vec![Stop::new("s", "Far")],
            Some(Location::new("d", "D")),
            &[vec![0, far, far], vec![far, 0, far], vec![far, far, 0]],
        )
        .expect("two arcs fit in u64");
        let solution = Solution::from_routes(&problem, vec![Route::new(0, vec![0])]);
        assert_eq!(solution.total_distance(), 18_446_744_073_709_551_614);
        assert_eq!(solution.validate(&problem), Ok(()));
    }
}
