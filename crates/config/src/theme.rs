// Theme configuration
// App themes, their palette tokens, and the spreadsheet (canvas grid) theme built from them

use crate::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppTheme {
    #[default]
    #[serde(rename = "theme-light")]
    ThemeLight,
    #[serde(rename = "theme-dark")]
    ThemeDark,
    #[serde(rename = "theme-high-contrast")]
    ThemeHighContrast,
}

impl AppTheme {
    pub const ALL: [AppTheme; 3] = [
        AppTheme::ThemeLight,
        AppTheme::ThemeDark,
        AppTheme::ThemeHighContrast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppTheme::ThemeLight => "theme-light",
            AppTheme::ThemeDark => "theme-dark",
            AppTheme::ThemeHighContrast => "theme-high-contrast",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, AppTheme::ThemeDark)
    }
}

impl fmt::Display for AppTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppTheme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}

/// Palette tokens as hex strings (`#RRGGBB` or `#RRGGBBAA`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub bg_layer1: &'static str,
    pub bg_layer2: &'static str,
    pub bg_layer4: &'static str,
    pub bg_accent_primary_alpha: &'static str,
    pub bg_accent_primary_alpha2: &'static str,
    pub bg_accent_tertiary: &'static str,
    pub bg_accent_tertiary_alpha: &'static str,
    pub bg_grid_colored_cell: &'static str,
    pub bg_grid_header: &'static str,
    pub stroke_grid: &'static str,
    pub stroke_grid_main: &'static str,
    pub stroke_secondary: &'static str,
    pub stroke_accent_primary: &'static str,
    pub stroke_accent_secondary: &'static str,
    pub stroke_error: &'static str,
    pub text_secondary: &'static str,
    pub text_warning: &'static str,
}

const LIGHT_PALETTE: ThemePalette = ThemePalette {
    bg_layer1: "#fcfcfc",
    bg_layer2: "#f3f4f6",
    bg_layer4: "#dde1e6",
    bg_accent_primary_alpha: "#5c8dea33",
    bg_accent_primary_alpha2: "#5c8dea1a",
    bg_accent_tertiary: "#e9dcf5",
    bg_accent_tertiary_alpha: "#a972ff1a",
    bg_grid_colored_cell: "#f5f8fd",
    bg_grid_header: "#e3ebfa",
    stroke_grid: "#eaeef2",
    stroke_grid_main: "#dde1e6",
    stroke_secondary: "#c3c9d0",
    stroke_accent_primary: "#2764d9",
    stroke_accent_secondary: "#009d9f",
    stroke_error: "#ae2f2f",
    text_secondary: "#7f8792",
    text_warning: "#986a08",
};

const DARK_PALETTE: ThemePalette = ThemePalette {
    bg_layer1: "#090d13",
    bg_layer2: "#141a23",
    bg_layer4: "#222932",
    bg_accent_primary_alpha: "#5c8dea33",
    bg_accent_primary_alpha2: "#5c8dea1a",
    bg_accent_tertiary: "#2d1e3d",
    bg_accent_tertiary_alpha: "#a972ff1a",
    bg_grid_colored_cell: "#0f151d",
    bg_grid_header: "#1b2a44",
    stroke_grid: "#222932",
    stroke_grid_main: "#333942",
    stroke_secondary: "#494f57",
    stroke_accent_primary: "#5c8dea",
    stroke_accent_secondary: "#37babc",
    stroke_error: "#f76464",
    text_secondary: "#7f8792",
    text_warning: "#f4ce46",
};

const HIGH_CONTRAST_PALETTE: ThemePalette = ThemePalette {
    bg_layer1: "#ffffff",
    bg_layer2: "#f0f0f0",
    bg_layer4: "#c8c8c8",
    bg_accent_primary_alpha: "#0037da40",
    bg_accent_primary_alpha2: "#0037da26",
    bg_accent_tertiary: "#e0c8ff",
    bg_accent_tertiary_alpha: "#7a00ff26",
    bg_grid_colored_cell: "#f4f7ff",
    bg_grid_header: "#d6e2ff",
    stroke_grid: "#8c8c8c",
    stroke_grid_main: "#000000",
    stroke_secondary: "#595959",
    stroke_accent_primary: "#0037da",
    stroke_accent_secondary: "#007a7c",
    stroke_error: "#c50f1f",
    text_secondary: "#3c3c3c",
    text_warning: "#8a5300",
};

pub fn palette(theme: AppTheme) -> ThemePalette {
    match theme {
        AppTheme::ThemeLight => LIGHT_PALETTE,
        AppTheme::ThemeDark => DARK_PALETTE,
        AppTheme::ThemeHighContrast => HIGH_CONTRAST_PALETTE,
    }
}

/// Palette converted for the canvas renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasColors {
    pub bg_layer1: Color,
    pub bg_layer2: Color,
    pub bg_layer4: Color,
    pub bg_accent_primary_alpha: Color,
    pub bg_accent_primary_alpha2: Color,
    pub bg_accent_tertiary: Color,
    pub bg_accent_tertiary_alpha: Color,
    pub bg_grid_colored_cell: Color,
    pub bg_grid_header: Color,
    pub stroke_grid: Color,
    pub stroke_grid_main: Color,
    pub stroke_secondary: Color,
    pub stroke_accent_primary: Color,
    pub stroke_accent_secondary: Color,
    pub stroke_error: Color,
    pub text_secondary: Color,
    pub text_warning: Color,
}

impl CanvasColors {
    /// Unparseable tokens become opaque magenta so they stand out on screen.
    pub fn from_palette(p: &ThemePalette) -> Self {
        let c = |hex: &str| {
            Color::parse_hex(hex).unwrap_or_else(|| {
                log::warn!("Invalid palette color: {}", hex);
                Color::from_rgb(1.0, 0.0, 1.0)
            })
        };
        CanvasColors {
            bg_layer1: c(p.bg_layer1),
            bg_layer2: c(p.bg_layer2),
            bg_layer4: c(p.bg_layer4),
            bg_accent_primary_alpha: c(p.bg_accent_primary_alpha),
            bg_accent_primary_alpha2: c(p.bg_accent_primary_alpha2),
            bg_accent_tertiary: c(p.bg_accent_tertiary),
            bg_accent_tertiary_alpha: c(p.bg_accent_tertiary_alpha),
            bg_grid_colored_cell: c(p.bg_grid_colored_cell),
            bg_grid_header: c(p.bg_grid_header),
            stroke_grid: c(p.stroke_grid),
            stroke_grid_main: c(p.stroke_grid_main),
            stroke_secondary: c(p.stroke_secondary),
            stroke_accent_primary: c(p.stroke_accent_primary),
            stroke_accent_secondary: c(p.stroke_accent_secondary),
            stroke_error: c(p.stroke_error),
            text_secondary: c(p.text_secondary),
            text_warning: c(p.text_warning),
        }
    }
}

/// Bitmap font colour variants loaded by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontColorName {
    LightTextPrimary,
    LightTextSecondary,
    LightTextError,
    LightTextAccent,
    LightTextAccentSecondary,
    DarkTextPrimary,
    DarkTextSecondary,
    DarkTextError,
    DarkTextAccent,
    DarkTextAccentSecondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    InconsolataRegular,
    InconsolataBold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontColors {
    pub text_primary: FontColorName,
    pub text_secondary: FontColorName,
    pub text_error: FontColorName,
    pub text_accent: FontColorName,
    pub text_accent_secondary: FontColorName,
}

impl FontColors {
    pub fn for_theme(theme: AppTheme) -> Self {
        if theme.is_dark() {
            FontColors {
                text_primary: FontColorName::DarkTextPrimary,
                text_secondary: FontColorName::DarkTextSecondary,
                text_error: FontColorName::DarkTextError,
                text_accent: FontColorName::DarkTextAccent,
                text_accent_secondary: FontColorName::DarkTextAccentSecondary,
            }
        } else {
            FontColors {
                text_primary: FontColorName::LightTextPrimary,
                text_secondary: FontColorName::LightTextSecondary,
                text_error: FontColorName::LightTextError,
                text_accent: FontColorName::LightTextAccent,
                text_accent_secondary: FontColorName::LightTextAccentSecondary,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTheme {
    pub line_color: Color,
    pub bg_color: Color,
}

/// Column and row header strips
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderTheme {
    pub border_color: Color,
    pub bg_color: Color,
    pub bg_color_selected: Color,
    pub bg_color_full_selected: Color,
    pub bg_color_hover: Color,
    pub font_color_name: FontColorName,
    pub font_family: FontFamily,
    pub resizer_hover_color: Color,
    pub resizer_active_color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBarTheme {
    pub track_color: Color,
    pub track_stroke_color: Color,
    pub thumb_color: Color,
    pub thumb_color_hovered: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTheme {
    pub border_color: Color,
    pub bg_color: Color,
    pub bg_even_color: Color,
    pub table_header_bg_color: Color,
    pub field_header_bg_color: Color,
    pub total_bg_color: Color,
    pub cell_font_color_name: FontColorName,
    pub cell_font_family: FontFamily,
    pub bold_cell_font_color_name: FontColorName,
    pub bold_cell_font_family: FontFamily,
    pub key_font_color_name: FontColorName,
    pub key_font_family: FontFamily,
    pub link_font_color_name: FontColorName,
    pub link_font_family: FontFamily,
    pub index_font_color_name: FontColorName,
    pub resizer_hover_color: Color,
    pub resizer_active_color: Color,
}

/// Stroke-only overlays (selection outlines, point-click, dotted copy marquee)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineTheme {
    pub color: Color,
    pub error_color: Option<Color>,
    pub alpha: f32,
    pub alignment: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionTheme {
    pub bg_alpha: f32,
    pub bg_color: Color,
    pub border_color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableShadowTheme {
    pub color: Color,
    pub alpha: f32,
    pub rectangle_alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadsheetTheme {
    pub theme_name: AppTheme,
    pub grid: GridTheme,
    pub col_number: HeaderTheme,
    pub row_number: HeaderTheme,
    pub scroll_bar: ScrollBarTheme,
    pub cell: CellTheme,
    pub selection: SelectionTheme,
    pub override_border_color: Color,
    pub error_border_color: Color,
    pub point_click_selection: OutlineTheme,
    pub dotted_selection: OutlineTheme,
    pub note_label_bg_color: Color,
    pub diff_bg_color: Color,
    pub dnd_selection_border_color: Color,
    pub hidden_cell_font_color_name: FontColorName,
    pub hidden_cell_font_family: FontFamily,
    pub table_shadow: TableShadowTheme,
}

fn create_spreadsheet_theme(theme: AppTheme) -> SpreadsheetTheme {
    let c = CanvasColors::from_palette(&palette(theme));
    let f = FontColors::for_theme(theme);
    let dark = theme.is_dark();

    let header = HeaderTheme {
        border_color: c.stroke_grid_main,
        bg_color: c.bg_layer2,
        bg_color_selected: c.bg_layer4,
        bg_color_full_selected: c.bg_accent_primary_alpha,
        bg_color_hover: c.bg_accent_primary_alpha2,
        font_color_name: f.text_secondary,
        font_family: FontFamily::InconsolataRegular,
        resizer_hover_color: c.stroke_secondary,
        resizer_active_color: c.stroke_accent_primary,
    };

    SpreadsheetTheme {
        theme_name: theme,
        grid: GridTheme {
            line_color: if dark {
                c.stroke_grid
            } else {
                c.stroke_grid_main
            },
            bg_color: c.bg_layer1,
        },
        col_number: header,
        row_number: header,
        scroll_bar: ScrollBarTheme {
            track_color: c.bg_layer1,
            track_stroke_color: c.stroke_grid_main,
            thumb_color: c.bg_layer4,
            thumb_color_hovered: c.text_secondary,
        },
        cell: CellTheme {
            border_color: c.stroke_secondary,
            bg_color: c.bg_layer1,
            bg_even_color: c.bg_grid_colored_cell,
            table_header_bg_color: c.bg_grid_header,
            field_header_bg_color: c.bg_layer4,
            total_bg_color: c.bg_accent_tertiary_alpha,
            cell_font_color_name: f.text_primary,
            cell_font_family: FontFamily::InconsolataRegular,
            bold_cell_font_color_name: f.text_primary,
            bold_cell_font_family: FontFamily::InconsolataBold,
            key_font_color_name: f.text_error,
            key_font_family: FontFamily::InconsolataBold,
            link_font_color_name: f.text_accent,
            link_font_family: FontFamily::InconsolataRegular,
            index_font_color_name: f.text_accent_secondary,
            resizer_hover_color: c.stroke_secondary,
            resizer_active_color: c.stroke_accent_primary,
        },
        selection: SelectionTheme {
            bg_alpha: 0.1,
            bg_color: c.stroke_accent_primary,
            border_color: c.stroke_accent_primary,
        },
        override_border_color: c.stroke_accent_secondary,
        error_border_color: c.stroke_error,
        point_click_selection: OutlineTheme {
            color: c.stroke_accent_secondary,
            error_color: Some(c.stroke_error),
            alpha: 1.0,
            alignment: 0.0,
        },
        dotted_selection: OutlineTheme {
            color: c.stroke_accent_primary,
            error_color: None,
            alpha: 1.0,
            alignment: 0.0,
        },
        note_label_bg_color: c.stroke_accent_secondary,
        diff_bg_color: c.bg_accent_tertiary,
        dnd_selection_border_color: c.text_warning,
        hidden_cell_font_color_name: f.text_secondary,
        hidden_cell_font_family: FontFamily::InconsolataRegular,
        table_shadow: TableShadowTheme {
            color: if dark {
                Color::from_hex(0xffffff)
            } else {
                Color::from_hex(0x000000)
            },
            alpha: 0.6,
            rectangle_alpha: 0.2,
        },
    }
}

/// Spreadsheet theme for an app theme. The grid only has light and dark
/// variants; every non-dark theme renders with the light one.
pub fn get_theme(theme: AppTheme) -> SpreadsheetTheme {
    let base = if theme.is_dark() {
        AppTheme::ThemeDark
    } else {
        AppTheme::ThemeLight
    };
    create_spreadsheet_theme(base)
}
