use std::collections::HashMap;

use geo::{Distance, Euclidean, Point};
use itertools::Itertools;
use transim_core::model::{Link, LinkId, Network, Node, NodeId, StopId, TransitSchedule};

use crate::prepare::{NetworkSynthesizer, PrepareError};

/// length assigned to the loop link anchoring the first stop of a route.
/// loop links connect a node to itself, so no geometric length exists.
const START_LOOP_LINK_LENGTH: f64 = 50.0;

/// synthesizes a minimal network around a transit schedule: one node per
/// stop facility and one link per consecutive stop pair of every route.
/// link ids carry a prefix so they cannot collide with links of a road
/// network the scenario may later be embedded into.
pub struct PseudoNetworkBuilder {
    prefix: String,
}

impl PseudoNetworkBuilder {
    pub fn new<S: Into<String>>(prefix: S) -> PseudoNetworkBuilder {
        PseudoNetworkBuilder {
            prefix: prefix.into(),
        }
    }
}

impl Default for PseudoNetworkBuilder {
    fn default() -> Self {
        PseudoNetworkBuilder::new("pt_")
    }
}

impl NetworkSynthesizer for PseudoNetworkBuilder {
    fn synthesize(
        &self,
        schedule: &mut TransitSchedule,
        network: &mut Network,
    ) -> Result<(), PrepareError> {
        let TransitSchedule { facilities, lines } = schedule;

        for facility in facilities.values().sorted_by_key(|f| f.id.clone()) {
            network.add_node(Node {
                id: NodeId::from(facility.id.as_str()),
                coord: facility.coord,
            });
        }

        let mut counter: usize = 0;
        let next_link_id = |counter: &mut usize| {
            let id = LinkId::new(format!("{}{}", self.prefix, counter));
            *counter += 1;
            id
        };

        // links between identical stop pairs are shared across routes
        let mut pair_links: HashMap<(StopId, StopId), LinkId> = HashMap::new();
        let mut loop_links: HashMap<StopId, LinkId> = HashMap::new();
        let mut facility_links: HashMap<StopId, LinkId> = HashMap::new();

        let line_ids = lines.keys().cloned().sorted().collect_vec();
        for line_id in line_ids {
            let Some(line) = lines.get_mut(&line_id) else {
                continue;
            };
            let route_ids = line.routes.keys().cloned().sorted().collect_vec();
            for route_id in route_ids {
                let Some(route) = line.routes.get_mut(&route_id) else {
                    continue;
                };
                route.links.clear();
                for (index, pair) in route.stops.windows(2).enumerate() {
                    let (src, dst) = (&pair[0].facility, &pair[1].facility);
                    let (Some(src_facility), Some(dst_facility)) =
                        (facilities.get(src), facilities.get(dst))
                    else {
                        log::warn!(
                            "route {route_id} of line {line_id} references a stop with no facility, skipping link synthesis for this pair"
                        );
                        continue;
                    };

                    if index == 0 {
                        let loop_id = loop_links
                            .entry(src.clone())
                            .or_insert_with(|| {
                                let id = next_link_id(&mut counter);
                                network.add_link(Link {
                                    id: id.clone(),
                                    from: NodeId::from(src.as_str()),
                                    to: NodeId::from(src.as_str()),
                                    length: START_LOOP_LINK_LENGTH,
                                });
                                id
                            })
                            .clone();
                        route.links.push(loop_id.clone());
                        facility_links.entry(src.clone()).or_insert(loop_id);
                    }

                    let link_id = pair_links
                        .entry((src.clone(), dst.clone()))
                        .or_insert_with(|| {
                            let id = next_link_id(&mut counter);
                            network.add_link(Link {
                                id: id.clone(),
                                from: NodeId::from(src.as_str()),
                                to: NodeId::from(dst.as_str()),
                                length: planar_distance(
                                    src_facility.coord,
                                    dst_facility.coord,
                                ),
                            });
                            id
                        })
                        .clone();
                    route.links.push(link_id.clone());
                    facility_links.insert(dst.clone(), link_id);
                }
            }
        }

        for (stop_id, link_id) in facility_links {
            if let Some(facility) = facilities.get_mut(&stop_id) {
                facility.link = Some(link_id);
            }
        }

        log::info!(
            "synthesized pseudo network: {} nodes, {} links",
            network.nodes.len(),
            network.links.len()
        );
        Ok(())
    }
}

/// straight-line distance between two points of the projected plane.
fn planar_distance(src: Point<f64>, dst: Point<f64>) -> f64 {
    Euclidean.distance(src, dst)
}
