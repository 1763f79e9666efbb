use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelName {
    ProjectTree,
    Inputs,
    CodeEditor,
    Errors,
    UndoRedo,
    Chat,
    Details,
}

impl PanelName {
    pub const ALL: [PanelName; 7] = [
        PanelName::ProjectTree,
        PanelName::Inputs,
        PanelName::CodeEditor,
        PanelName::Errors,
        PanelName::UndoRedo,
        PanelName::Chat,
        PanelName::Details,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PanelName::ProjectTree => "Project",
            PanelName::Inputs => "Inputs",
            PanelName::CodeEditor => "Editor",
            PanelName::Errors => "Errors",
            PanelName::UndoRedo => "History",
            PanelName::Chat => "Chat",
            PanelName::Details => "Details",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    Left,
    Right,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelInfo {
    pub position: PanelPosition,
    pub is_active: bool,
}

/// Which panels are open and where they are docked.
///
/// Without split panels only one panel per side is active at a time:
/// activating a panel deactivates the others on its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutState {
    panels: BTreeMap<PanelName, PanelInfo>,
    pub collapsed_panels_text_hidden: bool,
    pub panels_split_enabled: bool,
    pub expanded_panel_side: Option<PanelPosition>,
}

impl Default for LayoutState {
    fn default() -> Self {
        let panel = |position, is_active| PanelInfo {
            position,
            is_active,
        };
        let panels = BTreeMap::from([
            (PanelName::ProjectTree, panel(PanelPosition::Left, true)),
            (PanelName::Inputs, panel(PanelPosition::Left, false)),
            (PanelName::CodeEditor, panel(PanelPosition::Right, true)),
            (PanelName::UndoRedo, panel(PanelPosition::Right, false)),
            (PanelName::Chat, panel(PanelPosition::Right, false)),
            (PanelName::Errors, panel(PanelPosition::Bottom, false)),
            (PanelName::Details, panel(PanelPosition::Bottom, false)),
        ]);
        Self {
            panels,
            collapsed_panels_text_hidden: false,
            panels_split_enabled: false,
            expanded_panel_side: None,
        }
    }
}

impl LayoutState {
    pub fn panel(&self, name: PanelName) -> PanelInfo {
        self.panels.get(&name).copied().unwrap_or(PanelInfo {
            position: PanelPosition::Right,
            is_active: false,
        })
    }

    pub fn is_panel_opened(&self, name: PanelName) -> bool {
        self.panel(name).is_active
    }

    /// Panels docked at `position`, in `PanelName` order.
    pub fn panels_at(&self, position: PanelPosition) -> Vec<PanelName> {
        self.panels
            .iter()
            .filter(|(_, info)| info.position == position)
            .map(|(name, _)| *name)
            .collect()
    }

    fn activate(&mut self, name: PanelName) {
        let position = self.panel(name).position;
        if !self.panels_split_enabled {
            for (other, info) in self.panels.iter_mut() {
                if *other != name && info.position == position {
                    info.is_active = false;
                }
            }
        }
        self.panels
            .entry(name)
            .or_insert(PanelInfo {
                position,
                is_active: false,
            })
            .is_active = true;
    }

    pub fn toggle_panel(&mut self, name: PanelName) {
        if self.is_panel_opened(name) {
            if let Some(info) = self.panels.get_mut(&name) {
                info.is_active = false;
            }
        } else {
            self.activate(name);
        }
    }

    pub fn change_panel_position(&mut self, name: PanelName, position: PanelPosition) {
        let was_active = self.is_panel_opened(name);
        self.panels.insert(
            name,
            PanelInfo {
                position,
                is_active: false,
            },
        );
        if was_active {
            self.activate(name);
        }
    }

    /// Expand the side holding `name`, or restore it if already expanded.
    pub fn toggle_expand_panel(&mut self, name: PanelName) {
        let side = self.panel(name).position;
        self.expanded_panel_side = if self.expanded_panel_side == Some(side) {
            None
        } else {
            Some(side)
        };
    }

    pub fn update_collapsed_panels_text_hidden(&mut self, hidden: bool) {
        self.collapsed_panels_text_hidden = hidden;
    }

    pub fn update_split_panels_enabled(&mut self, enabled: bool) {
        self.panels_split_enabled = enabled;
    }
}
