//! The solve contract exposed to the surrounding service layer.
//!
//! Requests arrive as addresses and identifiers, responses leave as ordered
//! identifiers and distances. Failures carry an [`ErrorKind`] so callers can
//! map them onto their own transport without matching on messages.

use std::fmt;

use thiserror::Error;

use crate::{DistanceError, Location, ProblemError, Stop, Vehicle};

/// Identifier given to the shared destination of a request.
pub const DESTINATION_ID: &str = "destination";

/// A driver offering seats.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VehicleRequest {
    /// Vehicle identifier, echoed back in the response.
    pub id: String,
    /// Where the driver starts.
    pub origin_address: String,
    /// Passenger seats available.
    pub capacity: u32,
}

/// A passenger waiting for a pickup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopRequest {
    /// Passenger identifier, echoed back in the response.
    pub id: String,
    /// Pickup address.
    pub address: String,
}

/// Parameters for a solve request.
///
/// # Examples
/// ```rust
/// use carpool_core::{SolveRequest, StopRequest, VehicleRequest};
///
/// let request = SolveRequest {
///     vehicles: vec![VehicleRequest {
///         id: "bob".into(),
///         origin_address: "Home".into(),
///         capacity: 3,
///     }],
///     stops: vec![StopRequest {
///         id: "ana".into(),
///         address: "Cafe".into(),
///     }],
///     destination_address: Some("Office".into()),
///     budget: None,
/// };
/// assert_eq!(request.destination().map(|d| d.address), Some("Office".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SolveRequest {
    /// Participating vehicles, in priority order for tie breaks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub vehicles: Vec<VehicleRequest>,
    /// Passengers to collect.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stops: Vec<StopRequest>,
    /// Where every route ends.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub destination_address: Option<String>,
    /// Local-search iteration cap overriding the solver default.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub budget: Option<u64>,
}

impl SolveRequest {
    /// Domain vehicles in request order.
    #[must_use]
    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles
            .iter()
            .map(|vehicle| Vehicle::new(&vehicle.id, &vehicle.origin_address, vehicle.capacity))
            .collect()
    }

    /// Domain stops in request order.
    #[must_use]
    pub fn stops(&self) -> Vec<Stop> {
        self.stops
            .iter()
            .map(|stop| Stop::new(&stop.id, &stop.address))
            .collect()
    }

    /// The destination, or `None` when absent or blank.
    #[must_use]
    pub fn destination(&self) -> Option<Location> {
        self.destination_address
            .as_deref()
            .filter(|address| !address.trim().is_empty())
            .map(|address| Location::new(DESTINATION_ID, address))
    }
}

/// One vehicle's route in a response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RouteDescription {
    /// Vehicle identifier from the request.
    pub vehicle_id: String,
    /// Stop identifiers in pickup order.
    pub ordered_stops: Vec<String>,
    /// Route distance from origin to destination.
    pub distance: u64,
}

/// Response from a successful solve.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SolveResponse {
    /// One entry per vehicle, in request order.
    pub routes: Vec<RouteDescription>,
    /// Sum of route distances.
    pub total_distance: u64,
}

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// No destination supplied.
    MissingDestination,
    /// No vehicle supplied.
    MissingVehicle,
    /// A vehicle has no seats.
    InvalidCapacity,
    /// An identifier repeats.
    DuplicateIdentifier,
    /// The distance table does not describe the node set.
    InvalidDistanceMatrix,
    /// Total capacity is below the number of stops.
    InfeasibleCapacity,
    /// Construction found no vehicle for a stop.
    NoFeasibleAssignment,
    /// An address could not be geocoded.
    AddressResolutionError,
    /// The distance provider throttled the request.
    RateLimited,
    /// Any other distance provider failure.
    ProviderError,
}

impl ErrorKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingDestination => "MissingDestination",
            Self::MissingVehicle => "MissingVehicle",
            Self::InvalidCapacity => "InvalidCapacity",
            Self::DuplicateIdentifier => "DuplicateIdentifier",
            Self::InvalidDistanceMatrix => "InvalidDistanceMatrix",
            Self::InfeasibleCapacity => "InfeasibleCapacity",
            Self::NoFeasibleAssignment => "NoFeasibleAssignment",
            Self::AddressResolutionError => "AddressResolutionError",
            Self::RateLimited => "RateLimited",
            Self::ProviderError => "ProviderError",
        }
    }

    /// Whether the caller may retry the same request later.
    #[must_use]
    pub const fn is_upstream(self) -> bool {
        matches!(
            self,
            Self::AddressResolutionError | Self::RateLimited | Self::ProviderError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error returned to callers: `{ kind, message }`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorBody {
    /// Failure category.
    pub kind: ErrorKind,
    /// Human readable detail.
    pub message: String,
}

/// Errors returned by [`Solver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The request failed validation.
    #[error(transparent)]
    InvalidProblem(#[from] ProblemError),
    /// Distances could not be resolved.
    #[error(transparent)]
    Distance(#[from] DistanceError),
    /// Construction found no vehicle with spare capacity.
    #[error("no vehicle has spare capacity for stop {stop}")]
    NoFeasibleAssignment {
        /// Identifier of the first stop left unplaced.
        stop: String,
    },
}

impl SolveError {
    /// Failure category for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidProblem(err) => match err {
                ProblemError::MissingDestination => ErrorKind::MissingDestination,
                ProblemError::MissingVehicle => ErrorKind::MissingVehicle,
                ProblemError::InvalidCapacity { .. } => ErrorKind::InvalidCapacity,
                ProblemError::DuplicateIdentifier { .. } => ErrorKind::DuplicateIdentifier,
                ProblemError::InfeasibleCapacity { .. } => ErrorKind::InfeasibleCapacity,
                ProblemError::InvalidDistanceMatrix(_) => ErrorKind::InvalidDistanceMatrix,
            },
            Self::Distance(err) => match err {
                DistanceError::AddressResolution { .. } => ErrorKind::AddressResolutionError,
                DistanceError::RateLimited => ErrorKind::RateLimited,
                DistanceError::DimensionMismatch { .. } => ErrorKind::InvalidDistanceMatrix,
                DistanceError::EmptyInput
                | DistanceError::NoRoute { .. }
                | DistanceError::Timeout { .. }
                | DistanceError::HttpError { .. }
                | DistanceError::NetworkError { .. }
                | DistanceError::ServiceError { .. }
                | DistanceError::ParseError { .. } => ErrorKind::ProviderError,
            },
            Self::NoFeasibleAssignment { .. } => ErrorKind::NoFeasibleAssignment,
        }
    }

    /// The structured `{ kind, message }` body.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<&SolveError> for ErrorBody {
    fn from(err: &SolveError) -> Self {
        err.to_body()
    }
}

/// Alias for the solver error type.
pub type Error = SolveError;

/// Assign and order pickups for a request.
///
/// Implementations return an explicit [`SolveError`] rather than a partial
/// answer. Solvers must be `Send + Sync` so independent solves can share one
/// instance across threads.
pub trait Solver: Send + Sync {
    /// Solve a request, producing routes or an error.
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, Error>;
}
