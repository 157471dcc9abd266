use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{VehicleId, VehicleTypeId};

/// a vehicle type shared by all vehicles generated for routes of the same
/// transport mode. pcu_equivalents expresses how much general road capacity
/// one vehicle of this type consumes.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VehicleType {
    pub id: VehicleTypeId,
    pub mode: String,
    pub seats: u32,
    pub standing_room: u32,
    pub pcu_equivalents: f64,
}

/// a single transit vehicle serving one scheduled departure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransitVehicle {
    pub id: VehicleId,
    pub vehicle_type: VehicleTypeId,
}

/// the vehicle fleet of a scenario.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TransitVehicles {
    pub vehicles: HashMap<VehicleId, TransitVehicle>,
    pub vehicle_types: HashMap<VehicleTypeId, VehicleType>,
}

impl TransitVehicles {
    pub fn add_vehicle_type(&mut self, vehicle_type: VehicleType) {
        self.vehicle_types
            .insert(vehicle_type.id.clone(), vehicle_type);
    }

    pub fn add_vehicle(&mut self, vehicle: TransitVehicle) {
        self.vehicles.insert(vehicle.id.clone(), vehicle);
    }
}
