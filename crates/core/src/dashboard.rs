// Dashboard file list filtering

use serde::{Deserialize, Serialize};

/// Extension of QuantGrid project files
pub const PROJECT_EXTENSION: &str = "qg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardFilter {
    #[default]
    All,
    Folders,
    Projects,
    Files,
    CsvFiles,
}

impl DashboardFilter {
    pub const ALL: [DashboardFilter; 5] = [
        DashboardFilter::All,
        DashboardFilter::Folders,
        DashboardFilter::Projects,
        DashboardFilter::Files,
        DashboardFilter::CsvFiles,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DashboardFilter::All => "All types",
            DashboardFilter::Folders => "Folders",
            DashboardFilter::Projects => "Projects",
            DashboardFilter::Files => "Files",
            DashboardFilter::CsvFiles => "CSV files",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardFilter::All => "all",
            DashboardFilter::Folders => "folders",
            DashboardFilter::Projects => "projects",
            DashboardFilter::Files => "files",
            DashboardFilter::CsvFiles => "csvFiles",
        }
    }

    /// Parse a wire value. Unknown values select `All`.
    pub fn parse(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .unwrap_or_else(|| {
                log::debug!("Unknown dashboard filter {:?}, showing all", s);
                DashboardFilter::All
            })
    }

    pub fn matches(&self, item: &DashboardItem) -> bool {
        match self {
            DashboardFilter::All => true,
            DashboardFilter::Folders => item.kind == DashboardItemKind::Folder,
            DashboardFilter::Projects => item.is_project(),
            DashboardFilter::Files => item.kind == DashboardItemKind::File && !item.is_project(),
            DashboardFilter::CsvFiles => item.has_extension("csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardItemKind {
    Folder,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardItem {
    pub name: String,
    pub kind: DashboardItemKind,
}

impl DashboardItem {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DashboardItemKind::Folder,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DashboardItemKind::File,
        }
    }

    fn has_extension(&self, ext: &str) -> bool {
        self.kind == DashboardItemKind::File
            && self
                .name
                .rsplit_once('.')
                .is_some_and(|(stem, e)| !stem.is_empty() && e.eq_ignore_ascii_case(ext))
    }

    pub fn is_project(&self) -> bool {
        self.has_extension(PROJECT_EXTENSION)
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Items visible under `filter`. Dot-files are dropped unless `show_hidden`.
pub fn filter_items<'a>(
    items: &'a [DashboardItem],
    filter: DashboardFilter,
    show_hidden: bool,
) -> Vec<&'a DashboardItem> {
    items
        .iter()
        .filter(|item| show_hidden || !item.is_hidden())
        .filter(|item| filter.matches(item))
        .collect()
}
