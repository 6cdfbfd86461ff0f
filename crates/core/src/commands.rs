use serde::{Deserialize, Serialize};

use crate::entity::{EntityKind, TabId};
use crate::tabs::TabManager;

/// 標籤操作指令，可由事件記錄重播。 / A tab operation that can be recorded and replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TabCommand {
    Open {
        id: TabId,
        #[serde(rename = "type")]
        kind: EntityKind,
        #[serde(default = "default_closable")]
        closable: bool,
    },
    Close {
        id: TabId,
    },
    Select {
        id: TabId,
    },
    CloseToProject,
}

fn default_closable() -> bool {
    true
}

/// 重播時的行為選項。 / Behaviour switches applied while replaying a command log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayOptions {
    /// Return focus to the project overview after a close that removed a tab.
    pub restore_project_on_close: bool,
}

impl TabCommand {
    pub fn is_close(&self) -> bool {
        matches!(self, TabCommand::Close { .. })
    }
}

impl TabManager {
    /// 套用單一指令。 / Applies one command; returns whether the workspace changed.
    pub fn apply(&mut self, command: &TabCommand) -> bool {
        match command {
            TabCommand::Open { id, kind, closable } => {
                let before = (self.len(), self.active_tab_id().clone());
                self.open_tab(id.clone(), *kind, *closable);
                before != (self.len(), self.active_tab_id().clone())
            }
            TabCommand::Close { id } => self.close_tab(id),
            TabCommand::Select { id } => {
                let changed = self.active_tab_id() != id;
                self.select_tab(id) && changed
            }
            TabCommand::CloseToProject => {
                let changed = !self.active_tab_id().is_project();
                self.close_tab_to_project();
                changed
            }
        }
    }

    /// 從初始狀態重播指令序列。 / Builds a workspace by replaying commands from the initial state.
    pub fn replay<'a, I>(commands: I) -> Self
    where
        I: IntoIterator<Item = &'a TabCommand>,
    {
        Self::replay_with(commands, ReplayOptions::default())
    }

    /// 依選項重播指令。 / Replays commands with the given options.
    ///
    /// A close that removed nothing leaves focus where it was, and focus only
    /// returns to the project overview while its tab is still open.
    pub fn replay_with<'a, I>(commands: I, options: ReplayOptions) -> Self
    where
        I: IntoIterator<Item = &'a TabCommand>,
    {
        let mut manager = TabManager::new();
        for command in commands {
            let changed = manager.apply(command);
            if options.restore_project_on_close
                && changed
                && command.is_close()
                && manager.contains(&TabId::Project)
            {
                manager.close_tab_to_project();
            }
        }
        manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_log() {
        let log = r#"[
            {"op": "open", "id": "A", "type": "dataset"},
            {"op": "open", "id": "B", "type": "analysis", "closable": true},
            {"op": "close", "id": "A"},
            {"op": "select", "id": null},
            {"op": "close_to_project"}
        ]"#;
        let commands: Vec<TabCommand> = serde_json::from_str(log).unwrap();
        assert_eq!(commands.len(), 5);
        assert_eq!(
            commands[0],
            TabCommand::Open {
                id: TabId::entity("A"),
                kind: EntityKind::Dataset,
                closable: true,
            }
        );
        assert_eq!(commands[3], TabCommand::Select { id: TabId::Project });

        let manager = TabManager::replay(&commands);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.active_tab_id(), &TabId::Project);
    }

    fn open(id: &str) -> TabCommand {
        TabCommand::Open {
            id: TabId::entity(id),
            kind: EntityKind::Dataset,
            closable: true,
        }
    }

    fn close(id: TabId) -> TabCommand {
        TabCommand::Close { id }
    }

    #[test]
    fn restore_option_refocuses_project_after_close() {
        let options = ReplayOptions {
            restore_project_on_close: true,
        };
        let commands = [open("A"), open("B"), close(TabId::entity("A"))];
        let manager = TabManager::replay_with(&commands, options);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.active_tab_id(), &TabId::Project);
    }

    #[test]
    fn restore_option_ignores_close_of_missing_tab() {
        let options = ReplayOptions {
            restore_project_on_close: true,
        };
        let commands = [open("A"), close(TabId::entity("missing"))];
        let manager = TabManager::replay_with(&commands, options);
        assert_eq!(manager.active_tab_id(), &TabId::entity("A"));
    }

    #[test]
    fn restore_option_keeps_focus_valid_without_project_tab() {
        let options = ReplayOptions {
            restore_project_on_close: true,
        };
        let commands = [open("A"), open("B"), close(TabId::Project)];
        let manager = TabManager::replay_with(&commands, options);
        assert!(!manager.contains(&TabId::Project));
        assert_eq!(manager.active_tab_id(), &TabId::entity("B"));
        assert!(manager.contains(manager.active_tab_id()));
    }

    #[test]
    fn apply_reports_changes() {
        let mut manager = TabManager::new();
        let open = TabCommand::Open {
            id: TabId::entity("A"),
            kind: EntityKind::Pipeline,
            closable: true,
        };
        assert!(manager.apply(&open));
        assert!(!manager.apply(&open));
        assert!(manager.apply(&TabCommand::CloseToProject));
        assert!(!manager.apply(&TabCommand::Select {
            id: TabId::entity("missing")
        }));
        assert!(manager.apply(&TabCommand::Close {
            id: TabId::entity("A")
        }));
    }
}
