//! Session service
//!
//! Process-wide holder for the authenticated session. It is populated once at
//! login and cleared at logout; the HTTP client and the push client read the
//! token from it on demand instead of caching their own copy.

use shared::Session;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to the current session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the session produced by a successful login
    pub fn establish(&self, session: Session) {
        tracing::info!(username = %session.username, role = %session.role, "Session established");
        *self.write() = Some(session);
    }

    /// Drop the session (logout)
    pub fn clear(&self) {
        if self.write().take().is_some() {
            tracing::info!("Session cleared");
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.access_token.clone())
    }

    pub fn role(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.role.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(Session::is_admin)
    }

    /// Screens the current user may open
    pub fn menu(&self) -> Vec<MenuEntry> {
        self.role().map(|role| menu_for(&role)).unwrap_or_default()
    }

    // A panic while holding the lock cannot leave the Option half-written
    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// One entry of the navigation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    /// Resource path segment the screen manages
    pub resource: &'static str,
    pub label: &'static str,
    pub admin_only: bool,
}

const MENU: &[MenuEntry] = &[
    MenuEntry { resource: "Employee", label: "Employees", admin_only: false },
    MenuEntry { resource: "Department", label: "Departments", admin_only: false },
    MenuEntry { resource: "Position", label: "Positions", admin_only: false },
    MenuEntry { resource: "Contract", label: "Contracts", admin_only: true },
    MenuEntry { resource: "Course", label: "Courses", admin_only: false },
    MenuEntry { resource: "TrainingRecord", label: "Training records", admin_only: false },
    MenuEntry { resource: "Overtime", label: "Overtime", admin_only: false },
    MenuEntry { resource: "ShiftTemplate", label: "Shift templates", admin_only: true },
    MenuEntry { resource: "RewardPenalty", label: "Rewards & penalties", admin_only: true },
    MenuEntry { resource: "PayrollRun", label: "Payroll", admin_only: true },
    MenuEntry { resource: "SalaryConfig", label: "Salary settings", admin_only: true },
    MenuEntry { resource: "Notification", label: "Notifications", admin_only: false },
    MenuEntry { resource: "Role", label: "Roles", admin_only: true },
    MenuEntry { resource: "User", label: "Users", admin_only: true },
];

/// Menu entries visible to `role`
pub fn menu_for(role: &str) -> Vec<MenuEntry> {
    let admin = role.eq_ignore_ascii_case(shared::client::ADMIN_ROLE);
    MENU.iter()
        .filter(|entry| admin || !entry.admin_only)
        .copied()
        .collect()
}
