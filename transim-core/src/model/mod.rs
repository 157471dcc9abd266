mod id;
mod network;
mod scenario;
mod transform;
mod transit_schedule;
mod vehicles;

pub use id::{DepartureId, LineId, LinkId, NodeId, RouteId, StopId, VehicleId, VehicleTypeId};
pub use network::{Link, Network, Node};
pub use scenario::Scenario;
pub use transform::{CoordinateTransform, EquirectangularTransform, IdentityTransform};
pub use transit_schedule::{
    Departure, TransitLine, TransitRoute, TransitRouteStop, TransitSchedule, TransitStopFacility,
};
pub use vehicles::{TransitVehicle, TransitVehicles, VehicleType};
