use itertools::Itertools;
use transim_core::model::{
    TransitSchedule, TransitVehicle, TransitVehicles, VehicleId, VehicleType, VehicleTypeId,
};

use crate::prepare::{PrepareError, VehicleGenerator};

const DEFAULT_SEATS: u32 = 50;
const DEFAULT_STANDING_ROOM: u32 = 50;

/// derives a vehicle fleet from a transit schedule: one vehicle type per
/// transport mode appearing in the schedule and one vehicle per scheduled
/// departure. each departure receives a reference to its vehicle.
pub struct VehicleFleetGenerator {
    pub seats: u32,
    pub standing_room: u32,
}

impl Default for VehicleFleetGenerator {
    fn default() -> Self {
        VehicleFleetGenerator {
            seats: DEFAULT_SEATS,
            standing_room: DEFAULT_STANDING_ROOM,
        }
    }
}

impl VehicleGenerator for VehicleFleetGenerator {
    fn generate(
        &self,
        schedule: &mut TransitSchedule,
        vehicles: &mut TransitVehicles,
    ) -> Result<(), PrepareError> {
        let mut counter: usize = 0;

        let line_ids = schedule.lines.keys().cloned().sorted().collect_vec();
        for line_id in line_ids {
            let Some(line) = schedule.lines.get_mut(&line_id) else {
                continue;
            };
            let route_ids = line.routes.keys().cloned().sorted().collect_vec();
            for route_id in route_ids {
                let Some(route) = line.routes.get_mut(&route_id) else {
                    continue;
                };
                let type_id = VehicleTypeId::from(route.mode.as_str());
                vehicles
                    .vehicle_types
                    .entry(type_id.clone())
                    .or_insert_with(|| VehicleType {
                        id: type_id.clone(),
                        mode: route.mode.clone(),
                        seats: self.seats,
                        standing_room: self.standing_room,
                        pcu_equivalents: 1.0,
                    });
                for departure in route.departures.iter_mut() {
                    let vehicle_id = VehicleId::new(format!("veh_{counter}"));
                    vehicles.add_vehicle(TransitVehicle {
                        id: vehicle_id.clone(),
                        vehicle_type: type_id.clone(),
                    });
                    departure.vehicle = Some(vehicle_id);
                    counter += 1;
                }
            }
        }

        log::info!(
            "generated {} vehicles across {} vehicle types",
            vehicles.vehicles.len(),
            vehicles.vehicle_types.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use transim_core::model::{
        Departure, DepartureId, LineId, RouteId, TransitLine, TransitRoute,
    };

    fn schedule_with_departures(mode: &str, departures: usize) -> TransitSchedule {
        let mut schedule = TransitSchedule::default();
        let mut line = TransitLine::new(LineId::from("line"));
        let route = TransitRoute {
            id: RouteId::from("line_0"),
            mode: mode.to_string(),
            stops: vec![],
            links: vec![],
            departures: (0..departures)
                .map(|i| Departure {
                    id: DepartureId::new(format!("d{i}")),
                    time: 21_600 + i as u32 * 600,
                    vehicle: None,
                })
                .collect(),
        };
        line.routes.insert(route.id.clone(), route);
        schedule.add_transit_line(line);
        schedule
    }

    #[test]
    fn test_one_vehicle_per_departure() {
        let mut schedule = schedule_with_departures("bus", 3);
        let mut vehicles = TransitVehicles::default();
        VehicleFleetGenerator::default()
            .generate(&mut schedule, &mut vehicles)
            .expect("generation should not fail");

        assert_eq!(vehicles.vehicles.len(), 3);
        for line in schedule.lines.values() {
            for route in line.routes.values() {
                for departure in route.departures.iter() {
                    let vehicle_id = departure.vehicle.as_ref().expect("departure has a vehicle");
                    assert!(vehicles.vehicles.contains_key(vehicle_id));
                }
            }
        }
    }

    #[test]
    fn test_one_vehicle_type_per_mode() {
        let mut schedule = schedule_with_departures("bus", 2);
        let mut tram = TransitLine::new(LineId::from("tramline"));
        let route = TransitRoute {
            id: RouteId::from("tramline_0"),
            mode: String::from("tram"),
            stops: vec![],
            links: vec![],
            departures: vec![Departure {
                id: DepartureId::from("t0"),
                time: 25_200,
                vehicle: None,
            }],
        };
        tram.routes.insert(route.id.clone(), route);
        schedule.add_transit_line(tram);

        let mut vehicles = TransitVehicles::default();
        VehicleFleetGenerator::default()
            .generate(&mut schedule, &mut vehicles)
            .expect("generation should not fail");

        assert_eq!(vehicles.vehicle_types.len(), 2);
        assert!(vehicles
            .vehicle_types
            .contains_key(&VehicleTypeId::from("bus")));
        assert!(vehicles
            .vehicle_types
            .contains_key(&VehicleTypeId::from("tram")));
    }
}
