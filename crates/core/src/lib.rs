//! Workspace navigation and canvas routing primitives for Synesis.
//! Synesis 工作區標籤與畫布連線的核心模組。

pub mod commands;
pub mod edge_router;
pub mod entity;
pub mod graph;
pub mod tabs;

pub use commands::{ReplayOptions, TabCommand};
pub use edge_router::{
    compute_box_edge_locations, BoxGeometry, Edge, EdgeRouter, EntityPosition, GeometryError,
    SourceHandle, TargetHandle, DEFAULT_BOX_WIDTH,
};
pub use entity::{EntityId, EntityKind, EntityKindParseError, TabId};
pub use graph::{GraphError, GraphLink, GraphNode, ProjectGraph, RoutedEdge};
pub use tabs::{Tab, TabManager, TabWorkspaceSnapshot};
