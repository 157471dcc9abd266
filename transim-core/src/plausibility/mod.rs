//! detects and corrects implausible numeric values produced by schedule
//! conversion and network synthesis: non-positive or non-finite link
//! lengths, and stop facilities with non-finite coordinates.

mod report;

pub use report::{CorrectionReport, DanglingReference, LinkRepair};

use std::collections::HashSet;

use itertools::Itertools;

use crate::model::{LineId, Network, TransitSchedule, TransitStopFacility};

/// replacement length assigned to links whose stored length fails the
/// plausibility check. links are repaired rather than removed so that route
/// connectivity survives correction.
pub const FALLBACK_LINK_LENGTH: f64 = 1.234;

/// runs both correction sweeps in their required order: link lengths first,
/// then stop facilities and the lines that reference them.
pub fn correct_scenario(network: &mut Network, schedule: &mut TransitSchedule) -> CorrectionReport {
    let mut report = CorrectionReport::default();
    correct_network(network, &mut report);
    correct_schedule(schedule, &mut report);
    report
}

/// overwrites every implausible link length with [`FALLBACK_LINK_LENGTH`].
/// no links are removed.
pub fn correct_network(network: &mut Network, report: &mut CorrectionReport) {
    for link in network.links.values_mut() {
        if has_implausible_length(link.length) {
            log::warn!(
                "link length is {}. adjusting link length for link {}",
                link.length,
                link.id
            );
            report.repaired_links.push(LinkRepair {
                link: link.id.clone(),
                old_length: link.length,
            });
            link.length = FALLBACK_LINK_LENGTH;
        }
    }
}

/// removes every stop facility with a non-finite coordinate, together with
/// every transit line referencing such a facility.
///
/// four passes over the schedule, in an order that keeps the container
/// consistent at every observable point: implausible stops are collected
/// first, referencing lines are identified against the still-complete
/// facility map, then stops are removed, then lines. stop references whose
/// facility id was missing before correction are flagged separately and do
/// not mark their line for removal.
pub fn correct_schedule(schedule: &mut TransitSchedule, report: &mut CorrectionReport) {
    // pass 1: collect implausible stop ids
    let implausible: HashSet<_> = schedule
        .facilities
        .values()
        .filter(|facility| has_implausible_coordinate(facility))
        .map(|facility| {
            log::warn!(
                "transit stop coordinate is ({}, {}). adding stop {} / {} to the list of wrong stops",
                facility.coord.x(),
                facility.coord.y(),
                facility.id,
                facility.name
            );
            facility.id.clone()
        })
        .collect();

    // pass 2: scan every line -> route -> stop reference once
    let mut affected: Vec<LineId> = vec![];
    for line in schedule.lines.values() {
        for route in line.routes.values() {
            for stop in route.stops.iter() {
                if implausible.contains(&stop.facility) {
                    affected.push(line.id.clone());
                } else if !schedule.facilities.contains_key(&stop.facility) {
                    log::warn!(
                        "route {} of line {} references stop {} which has no facility in the schedule",
                        route.id,
                        line.id,
                        stop.facility
                    );
                    report.dangling_references.push(DanglingReference {
                        line: line.id.clone(),
                        stop: stop.facility.clone(),
                    });
                }
            }
        }
    }

    // pass 3: remove the implausible stops
    for id in implausible.iter().sorted() {
        log::warn!("removing stop {id}");
        schedule.remove_stop_facility(id);
        report.removed_stops.push(id.clone());
    }

    // pass 4: remove the affected lines. a line marked for several bad
    // stops is removed once, later removals of the same id are no-ops.
    for id in affected.iter() {
        if schedule.remove_transit_line(id).is_some() {
            log::warn!("removing transit line {id}");
            report.removed_lines.push(id.clone());
        }
    }
}

/// a link length is implausible unless it is a finite positive real number.
/// NaN fails both comparisons.
fn has_implausible_length(length: f64) -> bool {
    !(length > 0.0) || !(length < f64::INFINITY)
}

/// a stop coordinate is implausible unless both components are finite real
/// numbers. NaN fails both comparisons of each component.
fn has_implausible_coordinate(facility: &TransitStopFacility) -> bool {
    let (x, y) = (facility.coord.x(), facility.coord.y());
    !(x > f64::NEG_INFINITY)
        || !(x < f64::INFINITY)
        || !(y > f64::NEG_INFINITY)
        || !(y < f64::INFINITY)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{
        Departure, Link, LinkId, Network, Node, NodeId, RouteId, StopId, TransitLine,
        TransitRoute, TransitRouteStop, TransitSchedule, TransitStopFacility,
    };
    use geo::Point;

    fn link(id: &str, length: f64) -> Link {
        Link {
            id: LinkId::from(id),
            from: NodeId::from("a"),
            to: NodeId::from("b"),
            length,
        }
    }

    fn facility(id: &str, x: f64, y: f64) -> TransitStopFacility {
        TransitStopFacility {
            id: StopId::from(id),
            name: id.to_string(),
            coord: Point::new(x, y),
            link: None,
        }
    }

    fn route_over(id: &str, stop_ids: &[&str]) -> TransitRoute {
        TransitRoute {
            id: RouteId::from(id),
            mode: String::from("bus"),
            stops: stop_ids
                .iter()
                .map(|s| TransitRouteStop {
                    facility: StopId::from(*s),
                    arrival_offset: None,
                    departure_offset: Some(0),
                })
                .collect(),
            links: vec![],
            departures: vec![Departure {
                id: crate::model::DepartureId::from(id),
                time: 28_800,
                vehicle: None,
            }],
        }
    }

    fn line_over(id: &str, stop_ids: &[&str]) -> TransitLine {
        let mut line = TransitLine::new(LineId::from(id));
        let route = route_over(&format!("{id}_0"), stop_ids);
        line.routes.insert(route.id.clone(), route);
        line
    }

    fn network_with(lengths: &[(&str, f64)]) -> Network {
        let mut network = Network::default();
        network.add_node(Node {
            id: NodeId::from("a"),
            coord: Point::new(0.0, 0.0),
        });
        network.add_node(Node {
            id: NodeId::from("b"),
            coord: Point::new(1.0, 0.0),
        });
        for (id, length) in lengths {
            network.add_link(link(id, *length));
        }
        network
    }

    #[test]
    fn test_zero_length_link_repaired_to_fallback() {
        let mut network = network_with(&[("l0", 0.0)]);
        let mut report = CorrectionReport::default();
        correct_network(&mut network, &mut report);
        assert_eq!(network.links[&LinkId::from("l0")].length, 1.234);
        assert_eq!(report.repaired_links.len(), 1);
        assert_eq!(report.repaired_links[0].old_length, 0.0);
    }

    #[test]
    fn test_negative_length_link_repaired_to_fallback() {
        let mut network = network_with(&[("l0", -5.0)]);
        let mut report = CorrectionReport::default();
        correct_network(&mut network, &mut report);
        assert_eq!(network.links[&LinkId::from("l0")].length, 1.234);
    }

    #[test]
    fn test_nan_and_infinite_lengths_repaired() {
        let mut network = network_with(&[("l0", f64::NAN), ("l1", f64::INFINITY)]);
        let mut report = CorrectionReport::default();
        correct_network(&mut network, &mut report);
        for link in network.links.values() {
            assert_eq!(link.length, FALLBACK_LINK_LENGTH);
        }
        assert_eq!(report.repaired_links.len(), 2);
    }

    #[test]
    fn test_plausible_lengths_untouched() {
        let mut network = network_with(&[("l0", 120.5), ("l1", 0.001)]);
        let mut report = CorrectionReport::default();
        correct_network(&mut network, &mut report);
        assert!(report.repaired_links.is_empty());
        assert_eq!(network.links[&LinkId::from("l0")].length, 120.5);
    }

    #[test]
    fn test_nan_stop_removed_and_referencing_line_cascades() {
        let mut schedule = TransitSchedule::default();
        schedule.add_stop_facility(facility("s1", 7.0, 51.0));
        schedule.add_stop_facility(facility("s2", f64::NAN, 7.0));
        schedule.add_stop_facility(facility("s3", 7.1, 51.1));
        schedule.add_transit_line(line_over("bad", &["s1", "s2", "s3"]));
        schedule.add_transit_line(line_over("good", &["s1", "s3"]));

        let mut report = CorrectionReport::default();
        correct_schedule(&mut schedule, &mut report);

        assert_eq!(report.removed_stops, vec![StopId::from("s2")]);
        assert_eq!(report.removed_lines, vec![LineId::from("bad")]);
        assert!(!schedule.facilities.contains_key(&StopId::from("s2")));
        assert!(!schedule.lines.contains_key(&LineId::from("bad")));
        // the untouched line and its otherwise-valid stops survive
        assert!(schedule.lines.contains_key(&LineId::from("good")));
        assert!(schedule.facilities.contains_key(&StopId::from("s1")));
        assert!(schedule.facilities.contains_key(&StopId::from("s3")));
    }

    #[test]
    fn test_infinite_coordinate_component_prunes_stop() {
        let mut schedule = TransitSchedule::default();
        schedule.add_stop_facility(facility("s1", f64::NEG_INFINITY, 51.0));
        let mut report = CorrectionReport::default();
        correct_schedule(&mut schedule, &mut report);
        assert_eq!(report.removed_stops, vec![StopId::from("s1")]);
    }

    #[test]
    fn test_line_with_multiple_bad_stops_removed_once() {
        let mut schedule = TransitSchedule::default();
        schedule.add_stop_facility(facility("s1", f64::NAN, 51.0));
        schedule.add_stop_facility(facility("s2", 7.0, f64::NAN));
        schedule.add_transit_line(line_over("l", &["s1", "s2"]));

        let mut report = CorrectionReport::default();
        correct_schedule(&mut schedule, &mut report);

        assert_eq!(report.removed_lines, vec![LineId::from("l")]);
        assert_eq!(report.removed_stops.len(), 2);
    }

    #[test]
    fn test_remaining_lines_reference_no_removed_stop() {
        let mut schedule = TransitSchedule::default();
        schedule.add_stop_facility(facility("s1", 7.0, 51.0));
        schedule.add_stop_facility(facility("s2", f64::NAN, 51.0));
        schedule.add_stop_facility(facility("s3", 7.2, 51.2));
        schedule.add_transit_line(line_over("a", &["s1", "s2"]));
        schedule.add_transit_line(line_over("b", &["s1", "s3"]));

        let mut report = CorrectionReport::default();
        correct_schedule(&mut schedule, &mut report);

        for line in schedule.lines.values() {
            for route in line.routes.values() {
                for stop in route.stops.iter() {
                    assert!(schedule.facilities.contains_key(&stop.facility));
                }
            }
        }
        assert_eq!(report.removed_lines, vec![LineId::from("a")]);
    }

    #[test]
    fn test_clean_scenario_passes_through_unchanged() {
        let mut network = network_with(&[("l0", 55.0)]);
        let mut schedule = TransitSchedule::default();
        schedule.add_stop_facility(facility("s1", 7.0, 51.0));
        schedule.add_stop_facility(facility("s2", 7.1, 51.1));
        schedule.add_transit_line(line_over("l", &["s1", "s2"]));

        let report = correct_scenario(&mut network, &mut schedule);

        assert!(report.is_clean());
        assert_eq!(schedule.facilities.len(), 2);
        assert_eq!(schedule.lines.len(), 1);
    }

    #[test]
    fn test_correction_is_idempotent() {
        let mut network = network_with(&[("l0", 0.0), ("l1", 77.0)]);
        let mut schedule = TransitSchedule::default();
        schedule.add_stop_facility(facility("s1", 7.0, 51.0));
        schedule.add_stop_facility(facility("s2", f64::NAN, 51.0));
        schedule.add_transit_line(line_over("l", &["s1", "s2"]));

        let first = correct_scenario(&mut network, &mut schedule);
        assert!(!first.is_clean());

        let second = correct_scenario(&mut network, &mut schedule);
        assert!(second.is_clean());
    }

    #[test]
    fn test_dangling_reference_detected_but_line_retained() {
        let mut schedule = TransitSchedule::default();
        schedule.add_stop_facility(facility("s1", 7.0, 51.0));
        schedule.add_transit_line(line_over("l", &["s1", "missing"]));

        let mut report = CorrectionReport::default();
        correct_schedule(&mut schedule, &mut report);

        assert_eq!(report.dangling_references.len(), 1);
        assert_eq!(report.dangling_references[0].stop, StopId::from("missing"));
        assert!(report.removed_lines.is_empty());
        assert!(schedule.lines.contains_key(&LineId::from("l")));
    }

    #[test]
    fn test_reference_to_implausible_stop_not_counted_dangling() {
        let mut schedule = TransitSchedule::default();
        schedule.add_stop_facility(facility("s1", f64::NAN, 51.0));
        schedule.add_transit_line(line_over("l", &["s1"]));

        let mut report = CorrectionReport::default();
        correct_schedule(&mut schedule, &mut report);

        assert!(report.dangling_references.is_empty());
        assert_eq!(report.removed_lines, vec![LineId::from("l")]);
    }
}
