use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The sheet-content updater refused the batch. No history was recorded.
    UpdateRejected { sheets: Vec<String> },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateRejected { sheets } => {
                write!(f, "sheet update rejected for: {}", sheets.join(", "))
            }
        }
    }
}

impl std::error::Error for EditError {}
