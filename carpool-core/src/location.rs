//! Places, pickups and vehicles.
//!
//! These are plain immutable values. Validation that spans several of them
//! (unique identifiers, capacity coverage) lives in
//! [`RoutingProblem::build`](crate::RoutingProblem::build).

/// An opaque identifier paired with a display address.
///
/// # Examples
/// ```
/// use carpool_core::Location;
///
/// let office = Location::new("office", "1 Infinite Loop, Cupertino, CA");
/// assert_eq!(office.id, "office");
/// assert_eq!(office.address, "1 Infinite Loop, Cupertino, CA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Caller supplied identifier.
    pub id: String,
    /// Human readable address, also the key handed to distance providers.
    pub address: String,
}

impl Location {
    /// Construct a `Location` from an identifier and an address.
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
        }
    }
}

/// A passenger pickup.
///
/// Every stop carries exactly one unit of demand.
///
/// # Examples
/// ```
/// use carpool_core::Stop;
///
/// let stop = Stop::new("ana", "555 California St, San Francisco, CA");
/// assert_eq!(stop.id(), "ana");
/// assert_eq!(Stop::DEMAND, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Where the passenger waits.
    pub location: Location,
}

impl Stop {
    /// Seats consumed by one pickup.
    pub const DEMAND: u32 = 1;

    /// Construct a stop for passenger `id` waiting at `address`.
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            location: Location::new(id, address),
        }
    }

    /// The passenger identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.location.id
    }

    /// The pickup address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.location.address
    }
}

/// A driver's car.
///
/// The origin is the driver's own address; its identifier is the vehicle
/// identifier.
///
/// # Examples
/// ```
/// use carpool_core::Vehicle;
///
/// let car = Vehicle::new("bob", "2001 Point West Way, Sacramento, CA", 3);
/// assert_eq!(car.origin.id, "bob");
/// assert_eq!(car.capacity, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Vehicle identifier.
    pub id: String,
    /// Where the route starts.
    pub origin: Location,
    /// Maximum number of stops the vehicle may serve.
    pub capacity: u32,
}

impl Vehicle {
    /// Construct a vehicle starting at `origin_address`.
    pub fn new(id: impl Into<String>, origin_address: impl Into<String>, capacity: u32) -> Self {
        let id = id.into();
        Self {
            origin: Location::new(id.clone(), origin_address),
            id,
            capacity,
        }
    }
}
