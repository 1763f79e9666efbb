// Long-running project calculation indicator
// The server asks for confirmation before a long calculation; the user accepts
// or cancels it. Status changes only after the matching request succeeds.

use std::future::Future;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LongCalcStatus {
    #[default]
    None,
    NeedAccept,
    Accepted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongCalcIcon {
    /// Shown in error colour while waiting for the user.
    ClockExclamation,
    /// Shown in warning colour while the calculation runs.
    ClockCancel,
}

/// Project the calculation belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub bucket: String,
    pub path: Option<String>,
    pub name: String,
}

impl ProjectRef {
    /// `files/<bucket>/<path>/<name>`, skipping an empty path.
    pub fn api_path(&self) -> String {
        let mut segments = vec!["files", self.bucket.as_str()];
        if let Some(path) = self.path.as_deref().map(|p| p.trim_matches('/')) {
            if !path.is_empty() {
                segments.push(path);
            }
        }
        segments.push(&self.name);
        segments.join("/")
    }
}

/// Backend requests behind the accept and cancel buttons. Each resolves to
/// `true` when the server accepted the request.
pub trait CalculationRequests {
    fn send_project_calculate(&self, project_path: &str) -> impl Future<Output = bool>;
    fn send_project_cancel(&self, project_path: &str) -> impl Future<Output = bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongCalculation {
    status: LongCalcStatus,
    has_edit_permissions: bool,
    popover_open: bool,
}

impl LongCalculation {
    pub fn new(has_edit_permissions: bool) -> Self {
        Self {
            status: LongCalcStatus::None,
            has_edit_permissions,
            popover_open: false,
        }
    }

    pub fn status(&self) -> LongCalcStatus {
        self.status
    }

    /// A calculation waiting for acceptance opens the popover.
    pub fn set_status(&mut self, status: LongCalcStatus) {
        self.status = status;
        if status == LongCalcStatus::NeedAccept {
            self.popover_open = true;
        }
    }

    pub fn set_edit_permissions(&mut self, has_edit_permissions: bool) {
        self.has_edit_permissions = has_edit_permissions;
    }

    pub fn is_visible(&self) -> bool {
        self.has_edit_permissions
            && matches!(self.status, LongCalcStatus::NeedAccept | LongCalcStatus::Accepted)
    }

    pub fn is_popover_open(&self) -> bool {
        self.is_visible() && self.popover_open
    }

    pub fn set_popover_open(&mut self, open: bool) {
        self.popover_open = open;
    }

    pub fn icon(&self) -> LongCalcIcon {
        match self.status {
            LongCalcStatus::NeedAccept => LongCalcIcon::ClockExclamation,
            _ => LongCalcIcon::ClockCancel,
        }
    }

    /// Popover text and button label for the current status.
    pub fn prompt(&self) -> Option<(&'static str, &'static str)> {
        match self.status {
            LongCalcStatus::NeedAccept => Some((
                "Running the project calculation may take a while. \
                 Press Accept to keep calculations running in the background.",
                "Accept long calculation",
            )),
            LongCalcStatus::Accepted => Some((
                "A long calculation is in progress. You can cancel at any time.",
                "Cancel long calculation",
            )),
            LongCalcStatus::None | LongCalcStatus::Cancelled => None,
        }
    }

    /// Ask the server to keep calculating. Returns whether it agreed.
    pub async fn accept<R: CalculationRequests>(
        &mut self,
        requests: &R,
        project: &ProjectRef,
    ) -> bool {
        if !requests.send_project_calculate(&project.api_path()).await {
            log::warn!("Calculate request for {} was not accepted", project.name);
            return false;
        }
        self.set_status(LongCalcStatus::Accepted);
        true
    }

    /// Ask the server to stop calculating. Returns whether it agreed.
    pub async fn cancel<R: CalculationRequests>(
        &mut self,
        requests: &R,
        project: &ProjectRef,
    ) -> bool {
        if !requests.send_project_cancel(&project.api_path()).await {
            log::warn!("Cancel request for {} was not accepted", project.name);
            return false;
        }
        self.set_status(LongCalcStatus::Cancelled);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Requests {
        sent: RefCell<Vec<String>>,
        fail: bool,
    }

    impl CalculationRequests for Requests {
        fn send_project_calculate(&self, project_path: &str) -> impl Future<Output = bool> {
            self.sent.borrow_mut().push(format!("calculate {}", project_path));
            std::future::ready(!self.fail)
        }

        fn send_project_cancel(&self, project_path: &str) -> impl Future<Output = bool> {
            self.sent.borrow_mut().push(format!("cancel {}", project_path));
            std::future::ready(!self.fail)
        }
    }

    fn project() -> ProjectRef {
        ProjectRef {
            bucket: "bucket".to_string(),
            path: Some("team/q1".to_string()),
            name: "model".to_string(),
        }
    }

    #[test]
    fn test_api_path() {
        assert_eq!(project().api_path(), "files/bucket/team/q1/model");
        let root = ProjectRef {
            path: Some(String::new()),
            ..project()
        };
        assert_eq!(root.api_path(), "files/bucket/model");
    }

    #[test]
    fn test_visibility() {
        let mut calc = LongCalculation::new(true);
        assert!(!calc.is_visible());

        calc.set_status(LongCalcStatus::Accepted);
        assert!(calc.is_visible());
        calc.set_status(LongCalcStatus::Cancelled);
        assert!(!calc.is_visible());

        calc.set_status(LongCalcStatus::NeedAccept);
        calc.set_edit_permissions(false);
        assert!(!calc.is_visible());
        assert!(!calc.is_popover_open());
    }

    #[test]
    fn test_need_accept_opens_popover() {
        let mut calc = LongCalculation::new(true);
        calc.set_status(LongCalcStatus::NeedAccept);
        assert!(calc.is_popover_open());
        assert_eq!(calc.icon(), LongCalcIcon::ClockExclamation);
        assert_eq!(calc.prompt().map(|(_, button)| button), Some("Accept long calculation"));

        calc.set_popover_open(false);
        assert!(!calc.is_popover_open());
    }

    #[test]
    fn test_accept_then_cancel() {
        let requests = Requests::default();
        let mut calc = LongCalculation::new(true);
        calc.set_status(LongCalcStatus::NeedAccept);

        assert!(smol::block_on(calc.accept(&requests, &project())));
        assert_eq!(calc.status(), LongCalcStatus::Accepted);
        assert_eq!(calc.icon(), LongCalcIcon::ClockCancel);
        assert_eq!(calc.prompt().map(|(_, button)| button), Some("Cancel long calculation"));

        assert!(smol::block_on(calc.cancel(&requests, &project())));
        assert_eq!(calc.status(), LongCalcStatus::Cancelled);
        assert_eq!(
            *requests.sent.borrow(),
            vec!["calculate files/bucket/team/q1/model", "cancel files/bucket/team/q1/model"]
        );
    }

    #[test]
    fn test_failed_request_keeps_status() {
        let requests = Requests {
            fail: true,
            ..Requests::default()
        };
        let mut calc = LongCalculation::new(true);
        calc.set_status(LongCalcStatus::NeedAccept);

        assert!(!smol::block_on(calc.accept(&requests, &project())));
        assert_eq!(calc.status(), LongCalcStatus::NeedAccept);

        calc.set_status(LongCalcStatus::Accepted);
        assert!(!smol::block_on(calc.cancel(&requests, &project())));
        assert_eq!(calc.status(), LongCalcStatus::Accepted);
        assert_eq!(requests.sent.borrow().len(), 2);
    }
}
