use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entity::{EntityId, EntityKind, TabId};

/// 單一標籤的狀態。 / Metadata tracked per open tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub closable: bool,
}

impl Tab {
    /// 專案總覽標籤，永遠不可關閉。 / The project overview tab; never closable.
    pub fn project() -> Self {
        Self {
            id: TabId::Project,
            kind: EntityKind::Project,
            closable: false,
        }
    }
}

/// 可序列化的工作區快照。 / Serializable view of the tab workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabWorkspaceSnapshot {
    pub open_tabs: Vec<Tab>,
    pub active_tab_id: TabId,
}

/// 管理工作區標籤與目前焦點。 / Tracks the open tabs of a project workspace and which one is active.
///
/// Every entity has at most one tab. The project overview tab exists from the
/// start; callers must only offer a close action for tabs whose `closable`
/// flag is set, since `close_tab` itself does not refuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabManager {
    tabs: Vec<Tab>,
    active: TabId,
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManager {
    /// 建立只含專案標籤的工作區。 / Creates a workspace holding only the project tab.
    pub fn new() -> Self {
        Self {
            tabs: vec![Tab::project()],
            active: TabId::Project,
        }
    }

    /// 開啟或聚焦標籤。 / Opens a tab, or focuses it when already open.
    ///
    /// An existing tab keeps its position; a new one is appended.
    pub fn open_tab(&mut self, id: TabId, kind: EntityKind, closable: bool) {
        if self.contains(&id) {
            debug!(tab = %id, "focusing already open tab");
            self.active = id;
            return;
        }
        let tab = if id.is_project() {
            Tab::project()
        } else {
            Tab {
                id: id.clone(),
                kind,
                closable,
            }
        };
        debug!(tab = %id, kind = %tab.kind, closable = tab.closable, "opening tab");
        self.tabs.push(tab);
        self.active = id;
    }

    /// 以可關閉標籤開啟實體。 / Opens a closable tab for an entity.
    pub fn open_entity(&mut self, id: impl Into<EntityId>, kind: EntityKind) {
        self.open_tab(TabId::Entity(id.into()), kind, true);
    }

    /// 關閉標籤。 / Closes the referenced tab, returning whether it was open.
    ///
    /// When the closed tab was active, focus moves to the last remaining tab,
    /// or to the project sentinel if none remain.
    pub fn close_tab(&mut self, id: &TabId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let removed = self.tabs.remove(index);
        if !removed.closable {
            warn!(tab = %removed.id, "closed a tab that is marked non-closable");
        }
        if self.active == removed.id {
            self.active = self
                .tabs
                .last()
                .map(|tab| tab.id.clone())
                .unwrap_or(TabId::Project);
        }
        debug!(tab = %removed.id, active = %self.active, "closed tab");
        true
    }

    /// 回到專案總覽但不關閉任何標籤。 / Focuses the project overview without closing anything.
    pub fn close_tab_to_project(&mut self) {
        self.active = TabId::Project;
    }

    /// 聚焦已開啟的標籤；未開啟則忽略。 / Focuses an open tab. Unknown ids are ignored and return `false`.
    pub fn select_tab(&mut self, id: &TabId) -> bool {
        if !self.contains(id) {
            debug!(tab = %id, "ignoring selection of a tab that is not open");
            return false;
        }
        self.active = id.clone();
        true
    }

    /// 依顯示順序列出標籤。 / Open tabs in display order.
    pub fn open_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab_id(&self) -> &TabId {
        &self.active
    }

    /// 回傳目前的啟動標籤。 / Returns the active tab record, if it is still open.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == self.active)
    }

    pub fn contains(&self, id: &TabId) -> bool {
        self.tabs.iter().any(|tab| &tab.id == id)
    }

    pub fn position(&self, id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| &tab.id == id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn snapshot(&self) -> TabWorkspaceSnapshot {
        TabWorkspaceSnapshot {
            open_tabs: self.tabs.clone(),
            active_tab_id: self.active.clone(),
        }
    }
}
