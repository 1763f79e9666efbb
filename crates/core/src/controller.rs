// Root UI controller
// Owns app state and panel layout, applies menu actions.

use quantgrid_config::{AppState, KeyValueStore};

use crate::menu::{self, MenuAction, MenuEntry};
use crate::panel::{LayoutState, PanelName, PanelPosition};

/// State behind the AI pending-changes banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatOverlayState {
    pub ai_edit_pending_changes: bool,
}

impl ChatOverlayState {
    pub fn update_ai_edit_pending_changes(&mut self, editing: bool) {
        self.ai_edit_pending_changes = editing;
    }
}

#[derive(Debug)]
pub struct UiController<S: KeyValueStore> {
    pub app: AppState<S>,
    pub layout: LayoutState,
    pub chat_overlay: ChatOverlayState,
}

impl<S: KeyValueStore> UiController<S> {
    pub fn new(store: S) -> Self {
        Self {
            app: AppState::load(store),
            layout: LayoutState::default(),
            chat_overlay: ChatOverlayState::default(),
        }
    }

    /// Settings menu for `panel`, built from the current layout.
    pub fn panel_menu(&self, panel: PanelName, is_panel_collapsed: bool) -> Vec<MenuEntry> {
        let position: PanelPosition = self.layout.panel(panel).position;
        menu::panel_settings_items(&self.layout, panel, panel.title(), position, is_panel_collapsed)
    }

    pub fn ai_pending_changes_menu(&self) -> Vec<MenuEntry> {
        menu::ai_pending_changes_items(self.chat_overlay.ai_edit_pending_changes)
    }

    /// Run the action behind a menu item. Unknown keys are ignored.
    pub fn select(&mut self, entries: &[MenuEntry], key: &str) {
        match menu::action_for_key(entries, key) {
            Some(action) => self.dispatch(action),
            None => log::debug!("No menu item for key {:?}", key),
        }
    }

    pub fn dispatch(&mut self, action: MenuAction) {
        log::debug!("Menu action: {:?}", action);
        match action {
            MenuAction::MoveChatToWindow => self.app.toggle_chat_window_placement(),
            MenuAction::ToggleExpandPanel(panel) => self.layout.toggle_expand_panel(panel),
            MenuAction::ChangePanelPosition(panel, position) => {
                self.layout.change_panel_position(panel, position)
            }
            MenuAction::SetCollapsedPanelsTextHidden(hidden) => {
                self.layout.update_collapsed_panels_text_hidden(hidden)
            }
            MenuAction::SetPanelsSplitEnabled(enabled) => {
                self.layout.update_split_panels_enabled(enabled)
            }
            MenuAction::TogglePanel(panel) => self.layout.toggle_panel(panel),
            MenuAction::SetAIEditPendingChanges(editing) => {
                self.chat_overlay.update_ai_edit_pending_changes(editing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantgrid_config::app_state::ChatPlacement;
    use quantgrid_config::MemoryStore;

    fn controller() -> UiController<MemoryStore> {
        UiController::new(MemoryStore::new())
    }

    #[test]
    fn test_move_chat_to_window() {
        let mut ui = controller();
        let items = ui.panel_menu(PanelName::Chat, false);
        ui.select(&items, "move-chat");

        assert_eq!(ui.app.chat_window_placement(), ChatPlacement::Floating);
        assert!(ui.app.is_chat_open());
    }

    #[test]
    fn test_position_items_move_panel() {
        let mut ui = controller();
        let items = ui.panel_menu(PanelName::Errors, false);
        ui.select(&items, "left");
        assert_eq!(ui.layout.panel(PanelName::Errors).position, PanelPosition::Left);
    }

    #[test]
    fn test_label_and_split_toggles_flip() {
        let mut ui = controller();
        ui.select(&ui.panel_menu(PanelName::Inputs, false), "hideText");
        ui.select(&ui.panel_menu(PanelName::Inputs, false), "split");
        assert!(ui.layout.collapsed_panels_text_hidden);
        assert!(ui.layout.panels_split_enabled);

        ui.select(&ui.panel_menu(PanelName::Inputs, false), "split");
        assert!(!ui.layout.panels_split_enabled);
    }

    #[test]
    fn test_expand_collapse_relabels() {
        let mut ui = controller();
        ui.select(&ui.panel_menu(PanelName::Details, false), "expand-collapse");
        assert_eq!(ui.layout.expanded_panel_side, Some(PanelPosition::Bottom));

        let items = ui.panel_menu(PanelName::Details, false);
        assert_eq!(items[0].label(), Some("Restore Details"));
    }

    #[test]
    fn test_ai_edit_all_toggle() {
        let mut ui = controller();
        ui.select(&ui.ai_pending_changes_menu(), "editAll");
        assert!(ui.chat_overlay.ai_edit_pending_changes);
        assert_eq!(ui.ai_pending_changes_menu()[0].label(), Some("Cancel Edit All"));

        ui.select(&ui.ai_pending_changes_menu(), "editAll");
        assert!(!ui.chat_overlay.ai_edit_pending_changes);
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut ui = controller();
        let before = ui.layout.clone();
        ui.select(&ui.panel_menu(PanelName::Chat, false), "nope");
        assert_eq!(ui.layout, before);
    }
}
