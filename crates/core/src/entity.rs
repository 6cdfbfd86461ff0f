use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 工作區可管理的實體種類。 / Kinds of entity a project workspace can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    DataSource,
    Dataset,
    Analysis,
    Automation,
    Pipeline,
    ModelEntity,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Project,
        EntityKind::DataSource,
        EntityKind::Dataset,
        EntityKind::Analysis,
        EntityKind::Automation,
        EntityKind::Pipeline,
        EntityKind::ModelEntity,
    ];

    /// 對應的序列化字串。 / Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::DataSource => "data_source",
            EntityKind::Dataset => "dataset",
            EntityKind::Analysis => "analysis",
            EntityKind::Automation => "automation",
            EntityKind::Pipeline => "pipeline",
            EntityKind::ModelEntity => "model_entity",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity kind '{0}'")]
pub struct EntityKindParseError(pub String);

impl FromStr for EntityKind {
    type Err = EntityKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle)
            .ok_or_else(|| EntityKindParseError(value.to_string()))
    }
}

/// 實體識別碼。 / Opaque identifier of a domain entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 標籤識別碼：專案總覽或特定實體。 / Identifies a tab: the project overview or one entity.
///
/// Serializes as `null` for the project overview and as the bare entity id
/// otherwise, which is how the canvas and tab payloads encode it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TabId {
    #[default]
    Project,
    Entity(EntityId),
}

impl TabId {
    pub fn entity(id: impl Into<EntityId>) -> Self {
        TabId::Entity(id.into())
    }

    pub fn is_project(&self) -> bool {
        matches!(self, TabId::Project)
    }

    pub fn entity_id(&self) -> Option<&EntityId> {
        match self {
            TabId::Project => None,
            TabId::Entity(id) => Some(id),
        }
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabId::Project => f.write_str("<project>"),
            TabId::Entity(id) => write!(f, "{id}"),
        }
    }
}

impl From<Option<EntityId>> for TabId {
    fn from(value: Option<EntityId>) -> Self {
        value.map_or(TabId::Project, TabId::Entity)
    }
}

impl Serialize for TabId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.entity_id().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TabId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Option::<EntityId>::deserialize(deserializer).map(TabId::from)
    }
}
