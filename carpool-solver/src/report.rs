//! Translate a solution back into caller identifiers and addresses.

use std::fmt;

use carpool_core::{
    Distance, Location, RouteDescription, RoutingProblem, Solution, SolveResponse, Stop,
};

/// One vehicle's route expressed in locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteReport {
    /// Vehicle identifier.
    pub vehicle_id: String,
    /// Where the route starts.
    pub origin: Location,
    /// Pickups in visiting order.
    pub stops: Vec<Location>,
    /// Where the route ends.
    pub destination: Location,
    /// Route distance.
    pub distance: Distance,
}

/// Every route of a solution plus the aggregate distance.
///
/// The [`fmt::Display`] rendering lists each route as its addresses joined
/// by `->`, followed by its distance, and ends with the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionReport {
    /// Routes in vehicle order.
    pub routes: Vec<RouteReport>,
    /// Sum of route distances.
    pub total_distance: Distance,
}

/// Describe `solution` in terms of the locations in `problem`.
///
/// # Examples
/// ```
/// use carpool_core::{Location, RoutingProblem, Solution, Vehicle};
/// use carpool_solver::report;
///
/// let problem = RoutingProblem::build(
///     vec![Vehicle::new("car", "Home", 1)],
///     Vec::new(),
///     Some(Location::new("work", "Work")),
///     &[vec![0, 7], vec![7, 0]],
/// )?;
/// let summary = report(&problem, &Solution::empty(&problem));
/// assert_eq!(summary.total_distance, 7);
/// assert!(summary.to_string().ends_with("Total distance of all routes: 7m"));
/// # Ok::<(), carpool_core::ProblemError>(())
/// ```
#[must_use]
pub fn report(problem: &RoutingProblem, solution: &Solution) -> SolutionReport {
    let routes = solution
        .routes()
        .iter()
        .filter_map(|route| {
            let vehicle = problem.vehicles().get(route.vehicle())?;
            let stops = route
                .stops()
                .iter()
                .filter_map(|&stop| problem.stops().get(stop))
                .map(|stop: &Stop| stop.location.clone())
                .collect();
            Some(RouteReport {
                vehicle_id: vehicle.id.clone(),
                origin: vehicle.origin.clone(),
                stops,
                destination: problem.destination().clone(),
                distance: route.distance(problem),
            })
        })
        .collect();
    SolutionReport {
        routes,
        total_distance: solution.total_distance(),
    }
}

impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Route for vehicle {}:", self.vehicle_id)?;
        write!(f, " {}", self.origin.address)?;
        for stop in &self.stops {
            write!(f, " -> {}", stop.address)?;
        }
        writeln!(f, " -> {}", self.destination.address)?;
        write!(f, "Distance of the route: {}m", self.distance)
    }
}

impl fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for route in &self.routes {
            writeln!(f, "{route}")?;
            writeln!(f)?;
        }
        write!(f, "Total distance of all routes: {}m", self.total_distance)
    }
}

impl From<SolutionReport> for SolveResponse {
    fn from(report: SolutionReport) -> Self {
        Self {
            routes: report
                .routes
                .into_iter()
                .map(|route| RouteDescription {
                    vehicle_id: route.vehicle_id,
                    ordered_stops: route.stops.into_iter().map(|stop| stop.id).collect(),
                    distance: route.distance,
                })
                .collect(),
            total_distance: report.total_distance,
        }
    }
}
