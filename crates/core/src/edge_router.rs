//! Anchor selection for edges between entity boxes on the project canvas.
//! 專案畫布上實體方塊之間連線的錨點選擇。

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{trace, warn};

/// Nominal rendered width of an entity box, in canvas units.
pub const DEFAULT_BOX_WIDTH: f64 = 150.0;

/// 節點左上角座標。 / Top-left anchor of a node on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPosition {
    pub x_position: f64,
    pub y_position: f64,
}

impl EntityPosition {
    pub fn new(x_position: f64, y_position: f64) -> Self {
        Self {
            x_position,
            y_position,
        }
    }
}

impl fmt::Display for EntityPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x_position, self.y_position)
    }
}

/// 來源方塊上的連接點。 / Handle on the source box where an edge leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceHandle {
    #[serde(rename = "left-source")]
    Left,
    #[serde(rename = "right-source")]
    Right,
    #[serde(rename = "bottom-source")]
    Bottom,
    #[serde(rename = "top-source")]
    Top,
}

impl SourceHandle {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceHandle::Left => "left-source",
            SourceHandle::Right => "right-source",
            SourceHandle::Bottom => "bottom-source",
            SourceHandle::Top => "top-source",
        }
    }
}

/// 目標方塊上的連接點。 / Handle on the target box where an edge arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetHandle {
    #[serde(rename = "left-target")]
    Left,
    #[serde(rename = "right-target")]
    Right,
    #[serde(rename = "bottom-target")]
    Bottom,
    #[serde(rename = "top-target")]
    Top,
}

impl TargetHandle {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetHandle::Left => "left-target",
            TargetHandle::Right => "right-target",
            TargetHandle::Bottom => "bottom-target",
            TargetHandle::Top => "top-target",
        }
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一條連線的兩端錨點。 / Anchor pairing chosen for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: SourceHandle,
    pub to: TargetHandle,
}

impl Edge {
    pub const LEFTWARD: Edge = Edge {
        from: SourceHandle::Left,
        to: TargetHandle::Right,
    };
    pub const RIGHTWARD: Edge = Edge {
        from: SourceHandle::Right,
        to: TargetHandle::Left,
    };
    pub const UPWARD: Edge = Edge {
        from: SourceHandle::Top,
        to: TargetHandle::Bottom,
    };
    pub const DOWNWARD: Edge = Edge {
        from: SourceHandle::Bottom,
        to: TargetHandle::Top,
    };
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid edge location: source {from} / target {to}")]
    InvalidEdgeLocation {
        from: EntityPosition,
        to: EntityPosition,
    },
}

/// 方塊尺寸。 / Rendered box dimensions the routing thresholds derive from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub width: f64,
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOX_WIDTH,
        }
    }
}

/// Chooses which side of each box an edge attaches to.
///
/// Horizontal routing is only used when the boxes clear each other by a full
/// box width; otherwise the edge runs vertically so it does not cut through a
/// box body. Rules are tried in order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeRouter {
    geometry: BoxGeometry,
}

impl EdgeRouter {
    pub fn new(geometry: BoxGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> BoxGeometry {
        self.geometry
    }

    pub fn route(
        &self,
        source: EntityPosition,
        target: EntityPosition,
    ) -> Result<Edge, GeometryError> {
        let width = self.geometry.width;
        let edge = if source.x_position >= target.x_position + width {
            Edge::LEFTWARD
        } else if source.x_position < target.x_position - width {
            Edge::RIGHTWARD
        } else if source.y_position >= target.y_position {
            Edge::UPWARD
        } else if source.y_position < target.y_position {
            Edge::DOWNWARD
        } else {
            // Only unordered coordinates (NaN) get here.
            warn!(%source, %target, "no edge anchors for positions");
            return Err(GeometryError::InvalidEdgeLocation {
                from: source,
                to: target,
            });
        };
        trace!(%source, %target, %edge, "routed edge");
        Ok(edge)
    }
}

/// 以預設方塊寬度計算錨點。 / Routes with the default box width.
pub fn compute_box_edge_locations(
    source: EntityPosition,
    target: EntityPosition,
) -> Result<Edge, GeometryError> {
    EdgeRouter::default().route(source, target)
}
