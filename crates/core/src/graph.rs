use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::edge_router::{Edge, EdgeRouter, EntityPosition, GeometryError};
use crate::entity::{EntityId, EntityKind};

/// 專案圖上的節點。 / A node drawn on the project graph canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(flatten)]
    pub position: EntityPosition,
}

/// 兩個節點之間的關聯。 / A directed link between two nodes, e.g. data source to dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: EntityId,
    pub target: EntityId,
}

/// 已決定錨點的連線。 / A link together with the anchors chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedEdge {
    pub source: EntityId,
    pub target: EntityId,
    #[serde(flatten)]
    pub edge: Edge,
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("link references unknown node '{id}'")]
    UnknownNode { id: EntityId },
    #[error("node '{id}' is defined more than once")]
    DuplicateNode { id: EntityId },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Entity-relationship graph of one project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectGraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl ProjectGraph {
    /// Routes every link in declaration order.
    pub fn route_edges(&self, router: &EdgeRouter) -> Result<Vec<RoutedEdge>, GraphError> {
        let positions = self.positions()?;
        let lookup = |id: &EntityId| {
            positions
                .get(id)
                .copied()
                .ok_or_else(|| GraphError::UnknownNode { id: id.clone() })
        };

        let mut routed = Vec::with_capacity(self.links.len());
        for link in &self.links {
            let source = lookup(&link.source)?;
            let target = lookup(&link.target)?;
            let edge = router.route(source, target)?;
            routed.push(RoutedEdge {
                source: link.source.clone(),
                target: link.target.clone(),
                edge,
            });
        }
        debug!(
            nodes = self.nodes.len(),
            edges = routed.len(),
            "routed project graph"
        );
        Ok(routed)
    }

    fn positions(&self) -> Result<HashMap<&EntityId, EntityPosition>, GraphError> {
        let mut positions = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if positions.insert(&node.id, node.position).is_some() {
                return Err(GraphError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }
        Ok(positions)
    }
}
