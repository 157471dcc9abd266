use std::collections::HashMap;

use geo::Point;
use serde::{Deserialize, Serialize};

use super::{LinkId, NodeId};

/// a node of the synthesized network, placed at a stop facility coordinate.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub coord: Point<f64>,
}

/// a directed link of the synthesized network. lengths are stored in the
/// base distance unit of the scenario coordinate system.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Link {
    pub id: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    pub length: f64,
}

/// the network of a scenario. each conversion run owns its own instance;
/// there is no shared state between runs.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Network {
    pub nodes: HashMap<NodeId, Node>,
    pub links: HashMap<LinkId, Link>,
}

impl Network {
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.insert(link.id.clone(), link);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}
