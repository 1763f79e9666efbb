// Dropdown menu models
// Items carry a closed MenuAction; UiController::dispatch applies it.

use crate::panel::{LayoutState, PanelName, PanelPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuIcon {
    ChatLogo,
    ArrowNarrowUp,
    ArrowAlt,
    LeftPosition,
    RightPosition,
    BottomPosition,
    Typography,
    TypographyOff,
    Columns,
    MinimizePanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    MoveChatToWindow,
    ToggleExpandPanel(PanelName),
    ChangePanelPosition(PanelName, PanelPosition),
    SetCollapsedPanelsTextHidden(bool),
    SetPanelsSplitEnabled(bool),
    TogglePanel(PanelName),
    SetAIEditPendingChanges(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub label: String,
    pub icon: Option<MenuIcon>,
    pub action: MenuAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Divider,
}

impl MenuEntry {
    fn item(
        key: &'static str,
        label: impl Into<String>,
        icon: Option<MenuIcon>,
        action: MenuAction,
    ) -> Self {
        MenuEntry::Item(MenuItem {
            key,
            label: label.into(),
            icon,
            action,
        })
    }

    pub fn key(&self) -> Option<&'static str> {
        match self {
            MenuEntry::Item(item) => Some(item.key),
            MenuEntry::Divider => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            MenuEntry::Item(item) => Some(&item.label),
            MenuEntry::Divider => None,
        }
    }
}

/// Action bound to the item with `key`, as a click on it would trigger.
pub fn action_for_key(entries: &[MenuEntry], key: &str) -> Option<MenuAction> {
    entries.iter().find_map(|entry| match entry {
        MenuEntry::Item(item) if item.key == key => Some(item.action),
        _ => None,
    })
}

/// Settings menu shown in a panel header.
pub fn panel_settings_items(
    layout: &LayoutState,
    panel: PanelName,
    panel_title: &str,
    position: PanelPosition,
    is_panel_collapsed: bool,
) -> Vec<MenuEntry> {
    let mut entries = Vec::new();

    if panel == PanelName::Chat {
        entries.push(MenuEntry::item(
            "move-chat",
            "Move Chat to Window",
            Some(MenuIcon::ChatLogo),
            MenuAction::MoveChatToWindow,
        ));
    }

    if is_panel_collapsed {
        let label = if layout.is_panel_opened(panel) {
            "Collapse"
        } else {
            "Expand"
        };
        entries.push(MenuEntry::item(
            "expand",
            label,
            Some(MenuIcon::MinimizePanel),
            MenuAction::TogglePanel(panel),
        ));
        entries.push(MenuEntry::Divider);
    }

    let expanded = layout.expanded_panel_side == Some(position);
    let (label, icon) = if expanded {
        (format!("Restore {}", panel_title), MenuIcon::ArrowNarrowUp)
    } else {
        (format!("Expand {}", panel_title), MenuIcon::ArrowAlt)
    };
    entries.push(MenuEntry::item(
        "expand-collapse",
        label,
        Some(icon),
        MenuAction::ToggleExpandPanel(panel),
    ));
    entries.push(MenuEntry::Divider);

    for (key, label, icon, target) in [
        ("left", "Left", MenuIcon::LeftPosition, PanelPosition::Left),
        ("right", "Right", MenuIcon::RightPosition, PanelPosition::Right),
        ("bottom", "Bottom", MenuIcon::BottomPosition, PanelPosition::Bottom),
    ] {
        let action = MenuAction::ChangePanelPosition(panel, target);
        entries.push(MenuEntry::item(key, label, Some(icon), action));
    }

    entries.push(MenuEntry::Divider);
    let hidden = layout.collapsed_panels_text_hidden;
    entries.push(MenuEntry::item(
        "hideText",
        if hidden { "Show labels" } else { "Hide labels" },
        Some(if hidden {
            MenuIcon::Typography
        } else {
            MenuIcon::TypographyOff
        }),
        MenuAction::SetCollapsedPanelsTextHidden(!hidden),
    ));
    let split = layout.panels_split_enabled;
    entries.push(MenuEntry::item(
        "split",
        if split { "Merge panels" } else { "Split panels" },
        Some(MenuIcon::Columns),
        MenuAction::SetPanelsSplitEnabled(!split),
    ));

    entries
}

/// Context menu of the AI pending-changes banner.
pub fn ai_pending_changes_items(is_ai_edit_pending_changes: bool) -> Vec<MenuEntry> {
    vec![MenuEntry::item(
        "editAll",
        if is_ai_edit_pending_changes {
            "Cancel Edit All"
        } else {
            "Allow Edit All"
        },
        None,
        MenuAction::SetAIEditPendingChanges(!is_ai_edit_pending_changes),
    )]
}
