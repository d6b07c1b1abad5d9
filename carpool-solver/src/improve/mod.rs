//! First-improvement local search.
//!
//! Each iteration tries, in priority order, intra-route 2-opt, inter-route
//! relocation and inter-route swap, and commits the first strictly improving
//! move it finds. Moves are applied whole, so the solution is valid between
//! iterations and the search can stop at any iteration boundary.
//!
//! The search ends at a local optimum, when the iteration budget runs out, or
//! when an optional [`PlateauRule`] detects that recent iterations have
//! stopped paying off.

mod relocate;
mod swap;
mod two_opt;

use std::collections::VecDeque;

use carpool_core::{Distance, RoutingProblem, Solution};

use crate::cost::Delta;

/// Stop when improvement over a trailing window of iterations is too small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateauRule {
    /// Iterations to look back over; values below one are treated as one.
    pub window: u64,
    /// Minimum total distance saved across the window to keep going.
    pub min_improvement: Distance,
}

/// Bounds on local-search effort.
///
/// # Examples
/// ```
/// use carpool_solver::{PlateauRule, SearchBudget};
///
/// let budget = SearchBudget::iterations(500).with_plateau(PlateauRule {
///     window: 50,
///     min_improvement: 10,
/// });
/// assert_eq!(budget.max_iterations, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of iterations.
    pub max_iterations: u64,
    /// Optional early-stop rule.
    pub plateau: Option<PlateauRule>,
}

impl SearchBudget {
    /// Budget capped at `max_iterations` with no plateau rule.
    #[must_use]
    pub const fn iterations(max_iterations: u64) -> Self {
        Self {
            max_iterations,
            plateau: None,
        }
    }

    /// Attach a plateau rule.
    #[must_use]
    pub const fn with_plateau(mut self, plateau: PlateauRule) -> Self {
        self.plateau = Some(plateau);
        self
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// No improving move exists.
    LocalOptimum,
    /// The iteration cap was reached.
    BudgetExhausted,
    /// The plateau rule fired.
    Plateau,
}

/// Counters describing a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Iterations run, including a final one that found nothing.
    pub iterations: u64,
    /// Accepted 2-opt reversals.
    pub two_opt_moves: u64,
    /// Accepted relocations.
    pub relocations: u64,
    /// Accepted swaps.
    pub swaps: u64,
    /// Why the search stopped.
    pub stop_reason: StopReason,
}

impl SearchStats {
    /// Total accepted moves.
    #[must_use]
    pub const fn accepted_moves(&self) -> u64 {
        self.two_opt_moves + self.relocations + self.swaps
    }
}

#[derive(Debug, Clone, Copy)]
enum Move {
    TwoOpt(two_opt::TwoOpt),
    Relocate(relocate::Relocation),
    Swap(swap::Swap),
}

impl Move {
    const fn delta(self) -> Delta {
        match self {
            Self::TwoOpt(step) => step.delta,
            Self::Relocate(step) => step.delta,
            Self::Swap(step) => step.delta,
        }
    }
}

fn find_move(problem: &RoutingProblem, solution: &Solution) -> Option<Move> {
    two_opt::find(problem, solution)
        .map(Move::TwoOpt)
        .or_else(|| relocate::find(problem, solution).map(Move::Relocate))
        .or_else(|| swap::find(problem, solution).map(Move::Swap))
}

/// Tracks totals over the trailing plateau window.
struct PlateauWatch {
    rule: PlateauRule,
    totals: VecDeque<Distance>,
}

impl PlateauWatch {
    fn new(rule: PlateauRule, initial: Distance) -> Self {
        let mut totals = VecDeque::new();
        totals.push_back(initial);
        Self { rule, totals }
    }

    /// Record a new total; `true` when the window has stalled.
    fn record(&mut self, total: Distance) -> bool {
        self.totals.push_back(total);
        let window = usize::try_from(self.rule.window.max(1)).unwrap_or(usize::MAX);
        if self.totals.len() <= window {
            return false;
        }
        let oldest = self.totals.pop_front().unwrap_or(total);
        oldest.saturating_sub(total) < self.rule.min_improvement
    }
}

/// Improve `solution` within `budget`.
///
/// The result never has a larger total distance than the input and always
/// satisfies [`Solution::validate`] when the input does.
#[must_use]
pub fn improve(problem: &RoutingProblem, solution: Solution, budget: &SearchBudget) -> Solution {
    improve_with_stats(problem, solution, budget).0
}

/// Improve `solution` within `budget`, reporting search statistics.
///
/// # Examples
/// ```
/// use carpool_core::{Location, Route, RoutingProblem, Solution, Stop, Vehicle};
/// use carpool_solver::{SearchBudget, StopReason, improve_with_stats};
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
/// let start = Solution::from_routes(&problem, vec![Route::new(0, vec![0, 1])]);
/// assert_eq!(start.total_distance(), 22);
/// let (best, stats) = improve_with_stats(&problem, start, &SearchBudget::iterations(10));
/// assert_eq!(best.total_distance(), 10);
/// assert_eq!(stats.two_opt_moves, 1);
/// assert_eq!(stats.stop_reason, StopReason::LocalOptimum);
/// # Ok::<(), carpool_core::ProblemError>(())
/// ```
#[must_use]
pub fn improve_with_stats(
    problem: &RoutingProblem,
    mut solution: Solution,
    budget: &SearchBudget,
) -> (Solution, SearchStats) {
    let mut stats = SearchStats {
        iterations: 0,
        two_opt_moves: 0,
        relocations: 0,
        swaps: 0,
        stop_reason: StopReason::LocalOptimum,
    };
    let mut plateau = budget
        .plateau
        .map(|rule| PlateauWatch::new(rule, solution.total_distance()));

    loop {
        if stats.iterations >= budget.max_iterations {
            stats.stop_reason = StopReason::BudgetExhausted;
            break;
        }
        stats.iterations += 1;

        let Some(step) = find_move(problem, &solution) else {
            stats.stop_reason = StopReason::LocalOptimum;
            break;
        };
        match step {
            Move::TwoOpt(reversal) => {
                two_opt::apply(&mut solution, reversal);
                stats.two_opt_moves += 1;
            }
            Move::Relocate(relocation) => {
                relocate::apply(&mut solution, relocation);
                stats.relocations += 1;
            }
            Move::Swap(exchange) => {
                swap::apply(&mut solution, exchange);
                stats.swaps += 1;
            }
        }
        solution.recompute_total(problem);
        debug_assert!(
            solution.validate(problem).is_ok(),
            "local search move {step:?} broke the solution"
        );
        log::trace!(
            "iteration {}: {step:?} (delta {}), total {}",
            stats.iterations,
            step.delta(),
            solution.total_distance()
        );

        if plateau
            .as_mut()
            .is_some_and(|watch| watch.record(solution.total_distance()))
        {
            stats.stop_reason = StopReason::Plateau;
            break;
        }
    }

    log::debug!(
        "local search stopped after {} iterations ({:?}): {} moves, total {}",
        stats.iterations,
        stats.stop_reason,
        stats.accepted_moves(),
        solution.total_distance()
    );
    (solution, stats)
}
