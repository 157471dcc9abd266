use std::collections::HashMap;

use chrono::NaiveDate;
use geo::Point;
use gtfs_structures::{Gtfs, RouteType, Stop, StopTime, Trip};
use itertools::Itertools;
use transim_core::model::{
    CoordinateTransform, Departure, DepartureId, LineId, RouteId, Scenario, StopId, TransitLine,
    TransitRoute, TransitRouteStop, TransitSchedule, TransitStopFacility,
};

use crate::prepare::{service_day, PrepareError, ScheduleConverter};

/// converts the trips of a GTFS feed that are active on one reference date
/// into transit lines, routes, stop facilities and departures.
///
/// one transit line is created per GTFS route with at least one active
/// trip. within a line, trips sharing the same stop sequence collapse into
/// one route; every active trip contributes one departure.
pub struct GtfsScheduleConverter<'a> {
    gtfs: &'a Gtfs,
    date: NaiveDate,
    merge_stops: bool,
    transform: &'a dyn CoordinateTransform,
}

impl<'a> GtfsScheduleConverter<'a> {
    pub fn new(
        gtfs: &'a Gtfs,
        date: NaiveDate,
        merge_stops: bool,
        transform: &'a dyn CoordinateTransform,
    ) -> GtfsScheduleConverter<'a> {
        GtfsScheduleConverter {
            gtfs,
            date,
            merge_stops,
            transform,
        }
    }

    /// registers a stop facility for the given GTFS stop unless one was
    /// already assigned. stops without a usable location are kept with
    /// non-finite coordinates; the plausibility correction owns the
    /// removal policy for those.
    fn ensure_facility(
        &self,
        stop: &Stop,
        schedule: &mut TransitSchedule,
        assigned: &mut HashMap<String, StopId>,
        merged: &mut HashMap<(u64, u64), StopId>,
    ) {
        if assigned.contains_key(&stop.id) {
            return;
        }
        let coord = match stop_location(stop, self.gtfs) {
            Some(location) => self.transform.transform(location),
            None => {
                log::warn!(
                    "stop {} has no location on itself or its parent station",
                    stop.id
                );
                Point::new(f64::NAN, f64::NAN)
            }
        };
        if self.merge_stops && coord.x().is_finite() && coord.y().is_finite() {
            let key = (coord.x().to_bits(), coord.y().to_bits());
            if let Some(existing) = merged.get(&key) {
                log::debug!("merging stop {} into facility {existing}", stop.id);
                assigned.insert(stop.id.clone(), existing.clone());
                return;
            }
            merged.insert(key, StopId::from(stop.id.as_str()));
        }
        let id = StopId::from(stop.id.as_str());
        schedule.add_stop_facility(TransitStopFacility {
            id: id.clone(),
            name: stop.name.clone().unwrap_or_else(|| stop.id.clone()),
            coord,
            link: None,
        });
        assigned.insert(stop.id.clone(), id);
    }
}

impl ScheduleConverter for GtfsScheduleConverter<'_> {
    fn convert(&self, scenario: &mut Scenario) -> Result<(), PrepareError> {
        let mut active: Vec<&Trip> = vec![];
        for trip in self.gtfs.trips.values() {
            if service_day::service_runs_on(self.gtfs, &trip.service_id, &self.date)? {
                active.push(trip);
            }
        }
        log::info!(
            "{} of {} trips are active on {}",
            active.len(),
            self.gtfs.trips.len(),
            self.date
        );

        let mut assigned: HashMap<String, StopId> = HashMap::new();
        let mut merged: HashMap<(u64, u64), StopId> = HashMap::new();
        for trip in active.iter() {
            for stop_time in trip.stop_times.iter() {
                self.ensure_facility(
                    stop_time.stop.as_ref(),
                    &mut scenario.schedule,
                    &mut assigned,
                    &mut merged,
                );
            }
        }

        let by_route: HashMap<&String, Vec<&Trip>> =
            active.iter().map(|trip| (&trip.route_id, *trip)).into_group_map();

        for (route_id, mut trips) in by_route.into_iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            let route = self.gtfs.routes.get(route_id).ok_or_else(|| {
                PrepareError::MalformedFeed(format!(
                    "a trip references route id {route_id} which is missing from the archive"
                ))
            })?;
            let mode = transport_mode(&route.route_type);

            let mut line = TransitLine::new(LineId::from(route_id.as_str()));
            let mut patterns: HashMap<Vec<StopId>, RouteId> = HashMap::new();

            trips.sort_by_key(|trip| trip.id.clone());
            for trip in trips {
                let stop_times = ordered_stop_times(trip);
                let start = trip_departure_time(trip, &stop_times)?;
                let stops = stop_times
                    .iter()
                    .map(|stop_time| {
                        let facility =
                            assigned.get(&stop_time.stop.id).cloned().ok_or_else(|| {
                                PrepareError::Internal(format!(
                                    "stop {} of trip {} was not assigned a facility",
                                    stop_time.stop.id, trip.id
                                ))
                            })?;
                        Ok(TransitRouteStop {
                            facility,
                            arrival_offset: stop_time
                                .arrival_time
                                .map(|t| t.saturating_sub(start)),
                            departure_offset: stop_time
                                .departure_time
                                .map(|t| t.saturating_sub(start)),
                        })
                    })
                    .collect::<Result<Vec<_>, PrepareError>>()?;

                let pattern: Vec<StopId> = stops.iter().map(|s| s.facility.clone()).collect();
                let next_index = patterns.len();
                let route_key = patterns
                    .entry(pattern)
                    .or_insert_with(|| RouteId::new(format!("{route_id}_{next_index}")))
                    .clone();
                let transit_route =
                    line.routes.entry(route_key.clone()).or_insert_with(|| TransitRoute {
                        id: route_key,
                        mode: mode.clone(),
                        stops,
                        links: vec![],
                        departures: vec![],
                    });
                transit_route.departures.push(Departure {
                    id: DepartureId::from(trip.id.as_str()),
                    time: start,
                    vehicle: None,
                });
            }

            for transit_route in line.routes.values_mut() {
                transit_route
                    .departures
                    .sort_by_key(|d| (d.time, d.id.clone()));
            }
            scenario.schedule.add_transit_line(line);
        }

        log::info!(
            "converted stops: {}",
            scenario.schedule.facilities.len()
        );
        Ok(())
    }
}

/// the stop location, falling back to the parent station when the stop row
/// itself carries none. the fallback looks one level up only.
fn stop_location(stop: &Stop, gtfs: &Gtfs) -> Option<Point<f64>> {
    if let (Some(lon), Some(lat)) = (stop.longitude, stop.latitude) {
        return Some(Point::new(lon, lat));
    }
    stop.parent_station
        .as_ref()
        .and_then(|parent_id| gtfs.stops.get(parent_id))
        .and_then(|parent| match (parent.longitude, parent.latitude) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        })
}

/// stop times of a trip, ordered ascending by stop_sequence.
fn ordered_stop_times(trip: &Trip) -> Vec<StopTime> {
    trip.stop_times
        .iter()
        .cloned()
        .sorted_by_key(|stop_time| stop_time.stop_sequence)
        .collect_vec()
}

/// the departure time of a trip: the departure (or, failing that, arrival)
/// time at its first stop.
fn trip_departure_time(trip: &Trip, stop_times: &[StopTime]) -> Result<u32, PrepareError> {
    let first = stop_times.first().ok_or_else(|| {
        PrepareError::MalformedFeed(format!("trip {} has no stop times", trip.id))
    })?;
    first.departure_time.or(first.arrival_time).ok_or_else(|| {
        PrepareError::MalformedFeed(format!(
            "trip {} is missing both arrival and departure time at its first stop",
            trip.id
        ))
    })
}

/// maps the GTFS route type onto the transport mode tag used by routes and
/// vehicle types of the scenario.
fn transport_mode(route_type: &RouteType) -> String {
    let mode = match route_type {
        RouteType::Tramway => "tram",
        RouteType::Subway => "subway",
        RouteType::Rail => "rail",
        RouteType::Bus => "bus",
        RouteType::Ferry => "ferry",
        RouteType::CableCar => "cablecar",
        RouteType::Gondola => "gondola",
        RouteType::Funicular => "funicular",
        _ => "pt",
    };
    mode.to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::feed::load_feed;
    use transim_core::model::IdentityTransform;

    fn convert_fixture(merge_stops: bool) -> Scenario {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test")
            .join("feed");
        let gtfs = load_feed(path.to_str().expect("fixture path is not valid UTF-8"))
            .expect("test feed not found in test/feed");
        let date = NaiveDate::from_ymd_opt(2019, 12, 11).expect("invalid test date");
        let converter = GtfsScheduleConverter::new(&gtfs, date, merge_stops, &IdentityTransform);
        let mut scenario = Scenario::default();
        converter
            .convert(&mut scenario)
            .expect("conversion should not fail");
        scenario
    }

    #[test]
    fn test_one_line_per_route_with_active_trips() {
        let scenario = convert_fixture(false);
        let lines = &scenario.schedule.lines;
        assert_eq!(lines.len(), 4);
        for id in ["R1", "R2", "R3", "R4"] {
            assert!(lines.contains_key(&LineId::from(id)), "missing line {id}");
        }
    }

    #[test]
    fn test_trips_sharing_a_stop_pattern_collapse_into_one_route() {
        let scenario = convert_fixture(false);
        let line = &scenario.schedule.lines[&LineId::from("R1")];
        assert_eq!(line.routes.len(), 1);
        let route = line.routes.values().next().expect("route exists");
        // T1 and T2 on the weekday service plus T6 via the added exception
        assert_eq!(route.departures.len(), 3);
        assert_eq!(route.departures[0].time, 28_800);
    }

    #[test]
    fn test_stop_offsets_are_relative_to_trip_departure() {
        let scenario = convert_fixture(false);
        let line = &scenario.schedule.lines[&LineId::from("R1")];
        let route = line.routes.values().next().expect("route exists");
        assert_eq!(route.stops.len(), 3);
        assert_eq!(route.stops[0].departure_offset, Some(0));
        assert_eq!(route.stops[1].arrival_offset, Some(300));
        assert_eq!(route.stops[2].arrival_offset, Some(600));
    }

    #[test]
    fn test_stop_without_location_keeps_non_finite_coordinates() {
        let scenario = convert_fixture(false);
        let facility = &scenario.schedule.facilities[&StopId::from("S5")];
        assert!(facility.coord.x().is_nan());
        assert!(facility.coord.y().is_nan());
    }

    #[test]
    fn test_stop_without_location_falls_back_to_parent_station() {
        let scenario = convert_fixture(false);
        let facility = &scenario.schedule.facilities[&StopId::from("S7")];
        assert_eq!(facility.coord, Point::new(7.0950, 51.4950));
    }

    #[test]
    fn test_merge_stops_collapses_identical_coordinates() {
        let separate = convert_fixture(false);
        let merged = convert_fixture(true);
        // S2 and S4 share a coordinate and collapse into one facility
        assert_eq!(
            merged.schedule.facilities.len() + 1,
            separate.schedule.facilities.len()
        );
        let line = &merged.schedule.lines[&LineId::from("R2")];
        let route = line.routes.values().next().expect("route exists");
        assert_eq!(route.stops[0].facility, route.stops[1].facility);
    }

    #[test]
    fn test_inactive_trips_are_not_materialized() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test")
            .join("feed");
        let gtfs = load_feed(path.to_str().expect("fixture path is not valid UTF-8"))
            .expect("test feed not found in test/feed");
        // a sunday: no service runs at all
        let date = NaiveDate::from_ymd_opt(2019, 12, 15).expect("invalid test date");
        let converter = GtfsScheduleConverter::new(&gtfs, date, false, &IdentityTransform);
        let mut scenario = Scenario::default();
        converter
            .convert(&mut scenario)
            .expect("conversion should not fail");
        assert!(scenario.schedule.is_empty());
    }
}
