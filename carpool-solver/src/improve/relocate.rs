//! Inter-route relocation: move one stop into another vehicle.

use carpool_core::{RoutingProblem, Solution};

use crate::cost::{Delta, cheapest_insertion, has_spare_seat, removal_gain};

/// Move of the stop at `position` of `donor` into `receiver` at `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Relocation {
    pub(super) donor: usize,
    pub(super) position: usize,
    pub(super) receiver: usize,
    pub(super) target: usize,
    pub(super) delta: Delta,
}

/// First relocation whose donor saving exceeds the receiver's added cost.
///
/// The receiver must have a spare seat; the stop lands at the receiver's
/// cheapest insertion point.
pub(super) fn find(problem: &RoutingProblem, solution: &Solution) -> Option<Relocation> {
    let routes = solution.routes();
    for donor in routes {
        for (position, &stop) in donor.stops().iter().enumerate() {
            let gain = removal_gain(problem, donor, position);
            for receiver in routes.iter().filter(|receiver| {
                receiver.vehicle() != donor.vehicle() && has_spare_seat(problem, receiver)
            }) {
                let (target, cost) = cheapest_insertion(problem, receiver, stop);
                if cost < gain {
                    return Some(Relocation {
                        donor: donor.vehicle(),
                        position,
                        receiver: receiver.vehicle(),
                        target,
                        delta: cost - gain,
                    });
                }
            }
        }
    }
    None
}

/// Apply `step` to `solution`.
pub(super) fn apply(solution: &mut Solution, step: Relocation) {
    let moved = solution
        .route_mut(step.donor)
        .and_then(|route| route.remove(step.position));
    if let (Some(stop), Some(route)) = (moved, solution.route_mut(step.receiver)) {
        route.insert(step.target, stop);
    }
}
