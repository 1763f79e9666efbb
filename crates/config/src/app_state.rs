//! Application-wide UI state.
//!
//! One `AppState` is owned by the root controller. Persisted values (zoom,
//! theme, chat placement, hidden files) go through a `KeyValueStore`; values
//! read back from the store that are not recognised fall back to defaults.

use std::time::Duration;

use crate::error::ConfigError;
use crate::store::KeyValueStore;
use crate::theme::AppTheme;

pub const ZOOM_VALUES: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Delay before the loading overlay is hidden
pub const HIDE_LOADING_TIMEOUT: Duration = Duration::from_millis(300);

pub const ZOOM_KEY: &str = "zoom";
pub const THEME_KEY: &str = "app-theme";
pub const CHAT_PLACEMENT_KEY: &str = "chat-window-placement";
pub const SHOW_HIDDEN_FILES_KEY: &str = "show-hidden-files";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPlacement {
    #[default]
    Panel,
    Floating,
}

impl ChatPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatPlacement::Panel => "panel",
            ChatPlacement::Floating => "floating",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "panel" => Some(ChatPlacement::Panel),
            "floating" => Some(ChatPlacement::Floating),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ChatPlacement::Panel => ChatPlacement::Floating,
            ChatPlacement::Floating => ChatPlacement::Panel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormulaBarMode {
    #[default]
    Formula,
    Value,
}

/// What the cell editor is currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCellEditorMode {
    EmptyCell,
    RenameTable,
    RenameField,
    AddField,
    EditDimExpression,
    EditFieldExpression,
    EditCellExpression,
    AddTotal,
    EditTotal,
    EditOverride,
    AddOverride,
}

impl GridCellEditorMode {
    /// Modes that accept point-and-click references
    pub fn allows_point_click(&self) -> bool {
        matches!(
            self,
            GridCellEditorMode::EmptyCell
                | GridCellEditorMode::EditDimExpression
                | GridCellEditorMode::EditFieldExpression
                | GridCellEditorMode::EditCellExpression
                | GridCellEditorMode::AddTotal
                | GridCellEditorMode::EditTotal
                | GridCellEditorMode::EditOverride
                | GridCellEditorMode::AddOverride
        )
    }
}

/// Which editor started point-click mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClickModeSource {
    CellEditor,
    FormulaBar,
    CodeEditor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulasMenuTrigger {
    CodeEditor,
    FormulaBar,
    CellEditor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPlacement {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportInteractionMode {
    #[default]
    Select,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotTableWizardMode {
    Create,
    Edit,
}

#[derive(Debug)]
pub struct AppState<S: KeyValueStore> {
    store: S,
    zoom: f64,
    theme: AppTheme,
    loading: bool,
    is_chat_open: bool,
    chat_window_placement: ChatPlacement,
    formula_bar_mode: FormulaBarMode,
    formula_bar_expanded: bool,
    edit_mode: Option<GridCellEditorMode>,
    is_point_click_mode: bool,
    point_click_mode_source: Option<PointClickModeSource>,
    formulas_menu_placement: Option<MenuPlacement>,
    formulas_menu_trigger: Option<FormulasMenuTrigger>,
    show_hidden_files: bool,
    viewport_interaction_mode: ViewportInteractionMode,
    pivot_table_wizard_mode: Option<PivotTableWizardMode>,
    pivot_table_name: Option<String>,
}

impl<S: KeyValueStore> AppState<S> {
    /// Build state from persisted values, falling back to defaults.
    pub fn load(store: S) -> Self {
        let zoom = match store.get(ZOOM_KEY) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(z) if ZOOM_VALUES.contains(&z) => z,
                _ => {
                    log::warn!("Ignoring stored zoom {:?}", raw);
                    DEFAULT_ZOOM
                }
            },
            None => DEFAULT_ZOOM,
        };

        let theme = match store.get(THEME_KEY) {
            Some(raw) => raw.parse::<AppTheme>().unwrap_or_else(|e| {
                log::warn!("{}, using default theme", e);
                AppTheme::default()
            }),
            None => AppTheme::default(),
        };

        let chat_window_placement = match store.get(CHAT_PLACEMENT_KEY) {
            Some(raw) => ChatPlacement::parse(&raw).unwrap_or_else(|| {
                log::warn!("Ignoring stored chat placement {:?}", raw);
                ChatPlacement::default()
            }),
            None => ChatPlacement::default(),
        };

        let show_hidden_files = store.get(SHOW_HIDDEN_FILES_KEY).as_deref() == Some("true");

        Self {
            store,
            zoom,
            theme,
            loading: true,
            is_chat_open: false,
            chat_window_placement,
            formula_bar_mode: FormulaBarMode::default(),
            formula_bar_expanded: false,
            edit_mode: None,
            is_point_click_mode: false,
            point_click_mode_source: None,
            formulas_menu_placement: None,
            formulas_menu_trigger: None,
            show_hidden_files,
            viewport_interaction_mode: ViewportInteractionMode::default(),
            pivot_table_wizard_mode: None,
            pivot_table_name: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // Zoom

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set zoom to one of `ZOOM_VALUES`. Any other value is a caller bug.
    pub fn update_zoom(&mut self, zoom: f64) -> Result<(), ConfigError> {
        if !ZOOM_VALUES.contains(&zoom) {
            return Err(ConfigError::InvalidZoom(zoom));
        }
        self.zoom = zoom;
        self.store.set(ZOOM_KEY, &zoom.to_string());
        Ok(())
    }

    /// Step through `ZOOM_VALUES`. Steps past either end are ignored.
    pub fn update_zoom_with_wheel(&mut self, direction: i32) {
        let Some(current) = ZOOM_VALUES.iter().position(|&z| z == self.zoom) else {
            return;
        };
        let next = current as i64 + direction as i64;
        if next < 0 || next >= ZOOM_VALUES.len() as i64 {
            return;
        }
        self.zoom = ZOOM_VALUES[next as usize];
        self.store.set(ZOOM_KEY, &self.zoom.to_string());
    }

    // Theme

    pub fn theme(&self) -> AppTheme {
        self.theme
    }

    /// Unknown theme names select the default theme.
    pub fn update_theme(&mut self, theme: &str) {
        self.theme = theme.parse().unwrap_or_else(|e| {
            log::warn!("{}, using default theme", e);
            AppTheme::default()
        });
        self.store.set(THEME_KEY, self.theme.as_str());
    }

    // Loading

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Clear the loading flag once `timeout` has elapsed.
    pub async fn hide_loading(&mut self, timeout: Duration) {
        smol::Timer::after(timeout).await;
        self.loading = false;
    }

    // Chat

    pub fn is_chat_open(&self) -> bool {
        self.is_chat_open
    }

    pub fn chat_window_placement(&self) -> ChatPlacement {
        self.chat_window_placement
    }

    pub fn toggle_chat(&mut self) {
        self.is_chat_open = !self.is_chat_open;
    }

    /// Moving chat to a floating window opens it; docking it closes the window.
    pub fn toggle_chat_window_placement(&mut self) {
        let placement = self.chat_window_placement.toggled();
        self.store.set(CHAT_PLACEMENT_KEY, placement.as_str());
        self.is_chat_open = placement == ChatPlacement::Floating;
        self.chat_window_placement = placement;
    }

    // Formula bar and editing

    pub fn formula_bar_mode(&self) -> FormulaBarMode {
        self.formula_bar_mode
    }

    pub fn set_formula_bar_mode(&mut self, mode: FormulaBarMode) {
        self.formula_bar_mode = mode;
    }

    pub fn is_formula_bar_expanded(&self) -> bool {
        self.formula_bar_expanded
    }

    pub fn set_formula_bar_expanded(&mut self, expanded: bool) {
        self.formula_bar_expanded = expanded;
    }

    pub fn edit_mode(&self) -> Option<GridCellEditorMode> {
        self.edit_mode
    }

    /// Leaves point-click mode when the new edit mode does not support it.
    pub fn set_edit_mode(&mut self, mode: Option<GridCellEditorMode>) {
        self.edit_mode = mode;
        self.enforce_point_click_eligibility();
    }

    fn enforce_point_click_eligibility(&mut self) {
        let Some(mode) = self.edit_mode else {
            return;
        };
        if self.is_point_click_mode && !mode.allows_point_click() {
            log::debug!("{:?} does not accept point-click, leaving point-click mode", mode);
            self.is_point_click_mode = false;
            self.point_click_mode_source = None;
        }
    }

    pub fn is_point_click_mode(&self) -> bool {
        self.is_point_click_mode
    }

    pub fn point_click_mode_source(&self) -> Option<PointClickModeSource> {
        self.point_click_mode_source
    }

    /// Enabling is undone at once while the edit mode does not accept
    /// point-click references.
    pub fn switch_point_click_mode(&mut self, enabled: bool, source: Option<PointClickModeSource>) {
        self.is_point_click_mode = enabled;
        self.point_click_mode_source = if enabled { source } else { None };
        self.enforce_point_click_eligibility();
    }

    pub fn formulas_menu(&self) -> (Option<MenuPlacement>, Option<FormulasMenuTrigger>) {
        (self.formulas_menu_placement, self.formulas_menu_trigger)
    }

    pub fn set_formulas_menu(
        &mut self,
        placement: Option<MenuPlacement>,
        trigger: FormulasMenuTrigger,
    ) {
        self.formulas_menu_placement = placement;
        self.formulas_menu_trigger = Some(trigger);
    }

    // Files and viewport

    pub fn show_hidden_files(&self) -> bool {
        self.show_hidden_files
    }

    pub fn switch_show_hidden_files(&mut self, show: bool) {
        self.show_hidden_files = show;
        self.store.set(SHOW_HIDDEN_FILES_KEY, if show { "true" } else { "false" });
    }

    pub fn viewport_interaction_mode(&self) -> ViewportInteractionMode {
        self.viewport_interaction_mode
    }

    pub fn set_viewport_interaction_mode(&mut self, mode: ViewportInteractionMode) {
        self.viewport_interaction_mode = mode;
    }

    // Pivot table wizard

    pub fn pivot_table_wizard_mode(&self) -> Option<PivotTableWizardMode> {
        self.pivot_table_wizard_mode
    }

    pub fn pivot_table_name(&self) -> Option<&str> {
        self.pivot_table_name.as_deref()
    }

    pub fn change_pivot_table_wizard_mode(
        &mut self,
        mode: Option<PivotTableWizardMode>,
        table_name: Option<&str>,
    ) {
        self.pivot_table_wizard_mode = mode;
        self.pivot_table_name = table_name.filter(|n| !n.is_empty()).map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::time::Instant;

    fn state() -> AppState<MemoryStore> {
        AppState::load(MemoryStore::new())
    }

    #[test]
    fn test_defaults() {
        let s = state();
        assert_eq!(s.zoom(), 1.0);
        assert_eq!(s.theme(), AppTheme::ThemeLight);
        assert!(s.is_loading());
        assert!(!s.is_chat_open());
        assert_eq!(s.chat_window_placement(), ChatPlacement::Panel);
        assert_eq!(s.formula_bar_mode(), FormulaBarMode::Formula);
        assert_eq!(s.viewport_interaction_mode(), ViewportInteractionMode::Select);
        assert!(!s.show_hidden_files());
    }

    #[test]
    fn test_update_zoom_rejects_unknown_value() {
        let mut s = state();
        assert_eq!(s.update_zoom(0.6), Err(ConfigError::InvalidZoom(0.6)));
        assert_eq!(s.zoom(), 1.0);

        s.update_zoom(1.5).unwrap();
        assert_eq!(s.zoom(), 1.5);
        assert_eq!(s.store().get(ZOOM_KEY).as_deref(), Some("1.5"));
    }

    #[test]
    fn test_zoom_wheel_clamps_at_ends() {
        let mut s = state();
        s.update_zoom_with_wheel(1);
        assert_eq!(s.zoom(), 1.25);

        s.update_zoom(2.0).unwrap();
        s.update_zoom_with_wheel(1);
        assert_eq!(s.zoom(), 2.0);

        s.update_zoom(0.5).unwrap();
        s.update_zoom_with_wheel(-1);
        assert_eq!(s.zoom(), 0.5);
    }

    #[test]
    fn test_stored_values_are_loaded() {
        let store = MemoryStore::new()
            .with(ZOOM_KEY, "0.75")
            .with(THEME_KEY, "theme-dark")
            .with(CHAT_PLACEMENT_KEY, "floating")
            .with(SHOW_HIDDEN_FILES_KEY, "true");
        let s = AppState::load(store);

        assert_eq!(s.zoom(), 0.75);
        assert_eq!(s.theme(), AppTheme::ThemeDark);
        assert_eq!(s.chat_window_placement(), ChatPlacement::Floating);
        assert!(s.show_hidden_files());
    }

    #[test]
    fn test_invalid_stored_values_fall_back() {
        let store = MemoryStore::new()
            .with(ZOOM_KEY, "3")
            .with(THEME_KEY, "neon")
            .with(CHAT_PLACEMENT_KEY, "sidebar")
            .with(SHOW_HIDDEN_FILES_KEY, "yes");
        let s = AppState::load(store);

        assert_eq!(s.zoom(), DEFAULT_ZOOM);
        assert_eq!(s.theme(), AppTheme::ThemeLight);
        assert_eq!(s.chat_window_placement(), ChatPlacement::Panel);
        assert!(!s.show_hidden_files());
    }

    #[test]
    fn test_update_theme_falls_back_and_persists() {
        let mut s = state();
        s.update_theme("theme-dark");
        assert_eq!(s.theme(), AppTheme::ThemeDark);

        s.update_theme("");
        assert_eq!(s.theme(), AppTheme::ThemeLight);
        assert_eq!(s.store().get(THEME_KEY).as_deref(), Some("theme-light"));
    }

    #[test]
    fn test_chat_placement_toggle_opens_floating_chat() {
        let mut s = state();
        s.toggle_chat_window_placement();
        assert_eq!(s.chat_window_placement(), ChatPlacement::Floating);
        assert!(s.is_chat_open());
        assert_eq!(s.store().get(CHAT_PLACEMENT_KEY).as_deref(), Some("floating"));

        s.toggle_chat_window_placement();
        assert_eq!(s.chat_window_placement(), ChatPlacement::Panel);
        assert!(!s.is_chat_open());
    }

    #[test]
    fn test_point_click_source_cleared_when_disabled() {
        let mut s = state();
        s.switch_point_click_mode(true, Some(PointClickModeSource::FormulaBar));
        assert_eq!(s.point_click_mode_source(), Some(PointClickModeSource::FormulaBar));

        s.switch_point_click_mode(false, Some(PointClickModeSource::FormulaBar));
        assert_eq!(s.point_click_mode_source(), None);
    }

    #[test]
    fn test_ineligible_edit_mode_leaves_point_click() {
        let mut s = state();
        s.switch_point_click_mode(true, Some(PointClickModeSource::CellEditor));
        s.set_edit_mode(Some(GridCellEditorMode::EditFieldExpression));
        assert!(s.is_point_click_mode());

        s.set_edit_mode(Some(GridCellEditorMode::RenameTable));
        assert!(!s.is_point_click_mode());
        assert_eq!(s.point_click_mode_source(), None);
    }

    #[test]
    fn test_point_click_refused_under_ineligible_edit_mode() {
        let mut s = state();
        s.set_edit_mode(Some(GridCellEditorMode::RenameTable));
        s.switch_point_click_mode(true, Some(PointClickModeSource::CellEditor));
        assert!(!s.is_point_click_mode());
        assert_eq!(s.point_click_mode_source(), None);

        s.set_edit_mode(Some(GridCellEditorMode::AddTotal));
        s.switch_point_click_mode(true, Some(PointClickModeSource::CellEditor));
        assert!(s.is_point_click_mode());

        s.set_edit_mode(None);
        s.switch_point_click_mode(true, Some(PointClickModeSource::CodeEditor));
        assert_eq!(s.point_click_mode_source(), Some(PointClickModeSource::CodeEditor));
    }

    #[test]
    fn test_hide_loading_waits_for_timeout() {
        let mut s = state();
        assert!(s.is_loading());

        let started = Instant::now();
        smol::block_on(s.hide_loading(Duration::from_millis(20)));
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(!s.is_loading());
    }

    #[test]
    fn test_pivot_wizard_empty_name_is_none() {
        let mut s = state();
        s.change_pivot_table_wizard_mode(Some(PivotTableWizardMode::Edit), Some("Pivot1"));
        assert_eq!(s.pivot_table_name(), Some("Pivot1"));

        s.change_pivot_table_wizard_mode(Some(PivotTableWizardMode::Create), Some(""));
        assert_eq!(s.pivot_table_wizard_mode(), Some(PivotTableWizardMode::Create));
        assert_eq!(s.pivot_table_name(), None);
    }

    #[test]
    fn test_show_hidden_files_persists_flag() {
        let mut s = state();
        s.switch_show_hidden_files(true);
        assert_eq!(s.store().get(SHOW_HIDDEN_FILES_KEY).as_deref(), Some("true"));
        s.switch_show_hidden_files(false);
        assert_eq!(s.store().get(SHOW_HIDDEN_FILES_KEY).as_deref(), Some("false"));
    }
}
