//! `quantgrid-core`: panel layout, menu actions, dashboard filtering and the
//! long-calculation indicator.
//!
//! Menus are plain data: each entry carries a `MenuAction` value and the
//! `UiController` applies it with a single `match`.

pub mod controller;
pub mod dashboard;
pub mod long_calc;
pub mod menu;
pub mod panel;

pub use controller::{ChatOverlayState, UiController};
pub use dashboard::{filter_items, DashboardFilter, DashboardItem, DashboardItemKind};
pub use long_calc::{CalculationRequests, LongCalcIcon, LongCalcStatus, LongCalculation, ProjectRef};
pub use menu::{MenuAction, MenuEntry, MenuIcon, MenuItem};
pub use panel::{LayoutState, PanelInfo, PanelName, PanelPosition};
