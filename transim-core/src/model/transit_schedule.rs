use std::collections::HashMap;

use geo::Point;
use serde::{Deserialize, Serialize};

use super::{DepartureId, LineId, LinkId, RouteId, StopId, VehicleId};

/// a stop location served by transit routes. the link reference is assigned
/// once the pseudo network has been synthesized around the schedule.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransitStopFacility {
    pub id: StopId,
    pub name: String,
    pub coord: Point<f64>,
    pub link: Option<LinkId>,
}

/// a reference from a route to a stop facility, with arrival and departure
/// offsets in seconds relative to the departure time of the route.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransitRouteStop {
    pub facility: StopId,
    pub arrival_offset: Option<u32>,
    pub departure_offset: Option<u32>,
}

/// one scheduled run of a route. time is in seconds from midnight of the
/// service day; values above 86400 describe over-midnight departures.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Departure {
    pub id: DepartureId,
    pub time: u32,
    pub vehicle: Option<VehicleId>,
}

/// an ordered stop sequence pattern within a transit line, together with
/// the link path serving it and all scheduled departures.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransitRoute {
    pub id: RouteId,
    pub mode: String,
    pub stops: Vec<TransitRouteStop>,
    pub links: Vec<LinkId>,
    pub departures: Vec<Departure>,
}

/// a transit line owning one or more routes.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransitLine {
    pub id: LineId,
    pub routes: HashMap<RouteId, TransitRoute>,
}

impl TransitLine {
    pub fn new(id: LineId) -> TransitLine {
        TransitLine {
            id,
            routes: HashMap::new(),
        }
    }
}

/// the transit schedule of a scenario: stop facilities plus the lines that
/// reference them. route stops reference facilities by id, they do not own
/// them; removal ordering is the responsibility of the caller.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TransitSchedule {
    pub facilities: HashMap<StopId, TransitStopFacility>,
    pub lines: HashMap<LineId, TransitLine>,
}

impl TransitSchedule {
    pub fn add_stop_facility(&mut self, facility: TransitStopFacility) {
        self.facilities.insert(facility.id.clone(), facility);
    }

    pub fn add_transit_line(&mut self, line: TransitLine) {
        self.lines.insert(line.id.clone(), line);
    }

    /// removes a stop facility. removing an id twice is a no-op.
    pub fn remove_stop_facility(&mut self, id: &StopId) -> Option<TransitStopFacility> {
        self.facilities.remove(id)
    }

    /// removes a transit line along with its routes and their stop
    /// references. removing an id twice is a no-op.
    pub fn remove_transit_line(&mut self, id: &LineId) -> Option<TransitLine> {
        self.lines.remove(id)
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty() && self.lines.is_empty()
    }
}
