//! `InsertionSolver`: the end-to-end [`Solver`] implementation.
//!
//! A solve runs strictly forward through four stages: the problem is built
//! from the request and resolved distances, an initial solution is
//! constructed, local search improves it, and the result is reported in
//! caller identifiers. A failure at any stage ends the solve.

use carpool_core::{
    DistanceProvider, ProblemError, RoutingProblem, SolveError, SolveRequest, SolveResponse,
    Solution, Solver, resolve_distance_table,
};

use crate::construct::{ConstructionError, construct};
use crate::improve::{PlateauRule, SearchBudget, SearchStats, improve_with_stats};
use crate::report::{SolutionReport, report};

/// Default local-search iterations granted per stop.
pub const DEFAULT_ITERATIONS_PER_STOP: u64 = 1_000;

/// Configuration for [`InsertionSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionSolverConfig {
    /// Iterations granted per stop when a request names no budget.
    pub iterations_per_stop: u64,
    /// Floor on the derived iteration budget.
    pub min_iterations: u64,
    /// Optional early-stop rule applied to every solve.
    pub plateau: Option<PlateauRule>,
}

impl Default for InsertionSolverConfig {
    fn default() -> Self {
        Self {
            iterations_per_stop: DEFAULT_ITERATIONS_PER_STOP,
            min_iterations: DEFAULT_ITERATIONS_PER_STOP,
            plateau: None,
        }
    }
}

impl InsertionSolverConfig {
    /// Local-search budget for `problem`.
    ///
    /// `requested` wins when present; otherwise the budget is
    /// `iterations_per_stop × stops`, raised to `min_iterations`.
    #[must_use]
    pub fn budget_for(&self, problem: &RoutingProblem, requested: Option<u64>) -> SearchBudget {
        let stops = u64::try_from(problem.stops().len()).unwrap_or(u64::MAX);
        let max_iterations = requested.unwrap_or_else(|| {
            self.iterations_per_stop
                .saturating_mul(stops)
                .max(self.min_iterations)
        });
        SearchBudget {
            max_iterations,
            plateau: self.plateau,
        }
    }
}

/// Construct then improve a solution for an already built problem.
///
/// # Errors
///
/// Returns [`ConstructionError::NoFeasibleAssignment`] when the fleet cannot
/// seat every passenger.
///
/// # Examples
/// ```
/// use carpool_core::{Location, RoutingProblem, Stop, Vehicle};
/// use carpool_solver::{SearchBudget, solve_problem};
///
/// // Two drivers at 0 and 20, passengers at 18 and 2, office at 10.
/// let problem = RoutingProblem::build(
///     vec![Vehicle::new("west", "0", 1), Vehicle::new("east", "20", 1)],
///     vec![Stop::new("ana", "18"), Stop::new("ben", "2")],
///     Some(Location::new("office", "10")),
///     &[
///         vec![0, 20, 18, 2, 10],
///         vec![20, 0, 2, 18, 10],
///         vec![18, 2, 0, 16, 8],
///         vec![2, 18, 16, 0, 8],
///         vec![10, 10, 8, 8, 0],
///     ],
/// )?;
/// let (solution, _) = solve_problem(&problem, &SearchBudget::iterations(100))?;
/// assert_eq!(solution.total_distance(), 20);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn solve_problem(
    problem: &RoutingProblem,
    budget: &SearchBudget,
) -> Result<(Solution, SearchStats), ConstructionError> {
    let initial = construct(problem)?;
    let constructed = initial.total_distance();
    let (solution, stats) = improve_with_stats(problem, initial, budget);
    log::debug!(
        "improved total distance from {constructed} to {}",
        solution.total_distance()
    );
    Ok((solution, stats))
}

/// Cheapest-insertion solver with first-improvement local search.
///
/// The solver is generic over the distance provider. It performs no I/O of
/// its own, so concurrent solves on one instance share nothing mutable
/// beyond what the provider itself shares.
///
/// # Examples
/// ```
/// use carpool_core::{SolveRequest, Solver, StaticDistanceProvider, StopRequest, VehicleRequest};
/// use carpool_solver::InsertionSolver;
///
/// let provider = StaticDistanceProvider::new(
///     vec!["Home".into(), "Cafe".into(), "Office".into()],
///     vec![vec![0, 2, 9], vec![2, 0, 8], vec![9, 8, 0]],
/// )?;
/// let solver = InsertionSolver::new(provider);
/// let request = SolveRequest {
///     vehicles: vec![VehicleRequest {
///         id: "car".into(),
///         origin_address: "Home".into(),
///         capacity: 1,
///     }],
///     stops: vec![StopRequest {
///         id: "ana".into(),
///         address: "Cafe".into(),
///     }],
///     destination_address: Some("Office".into()),
///     budget: None,
/// };
/// let response = solver.solve(&request)?;
/// assert_eq!(response.routes[0].ordered_stops, vec!["ana".to_owned()]);
/// assert_eq!(response.total_distance, 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct InsertionSolver<P> {
    provider: P,
    config: InsertionSolverConfig,
}

impl<P> InsertionSolver<P>
where
    P: DistanceProvider,
{
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, InsertionSolverConfig::default())
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(provider: P, config: InsertionSolverConfig) -> Self {
        Self { provider, config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &InsertionSolverConfig {
        &self.config
    }

    /// Build the routing problem for `request`, resolving distances.
    ///
    /// Entity checks run before the provider is called, so malformed requests
    /// never cost a provider round trip.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`RoutingProblem::build`] and provider
    /// errors from [`DistanceProvider::resolve_matrix`].
    pub fn build_problem(&self, request: &SolveRequest) -> Result<RoutingProblem, SolveError> {
        let vehicles = request.vehicles();
        let stops = request.stops();
        let destination = request.destination();
        RoutingProblem::validate_entities(&vehicles, &stops, destination.as_ref())?;
        let Some(target) = destination else {
            return Err(ProblemError::MissingDestination.into());
        };

        let table = resolve_distance_table(&self.provider, &vehicles, &stops, &target)?;
        let problem = RoutingProblem::build(vehicles, stops, Some(target), &table)?;
        log::debug!(
            "built problem with {} vehicles, {} stops and {} nodes",
            problem.vehicles().len(),
            problem.stops().len(),
            problem.node_count()
        );
        Ok(problem)
    }

    /// Solve `request` and keep the addresses for presentation.
    ///
    /// [`Solver::solve`] is this report converted to a [`SolveResponse`].
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Solver::solve`].
    pub fn solve_report(&self, request: &SolveRequest) -> Result<SolutionReport, SolveError> {
        let problem = self.build_problem(request)?;
        let budget = self.config.budget_for(&problem, request.budget);
        let (solution, stats) = solve_problem(&problem, &budget)?;
        let summary = report(&problem, &solution);
        log::info!(
            "solved {} stops across {} vehicles: total distance {} after {} iterations ({:?})",
            problem.stops().len(),
            problem.vehicles().len(),
            summary.total_distance,
            stats.iterations,
            stats.stop_reason
        );
        Ok(summary)
    }
}

impl<P> Solver for InsertionSolver<P>
where
    P: DistanceProvider + Send + Sync,
{
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError> {
        self.solve_report(request).map(SolveResponse::from)
    }
}
