//! Screen controller — flat finite-state navigation between the three
//! screens. No history stack; every transition is an explicit user action.

/// The active screen. Exactly one is active at a time; the session starts
/// on Login and cycles indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Settings,
    Project,
}

/// Navigation events produced by user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    /// Any submission succeeds; no real authentication is performed.
    LoginSubmitted,
    SettingsOpened,
    SettingsSaved,
    SettingsCancelled,
    LoggedOut,
}

impl Screen {
    /// Pure transition function. Events that are not valid for the current
    /// screen leave it unchanged.
    pub fn transition(self, event: Nav) -> Screen {
        match (self, event) {
            (Screen::Login, Nav::LoginSubmitted) => Screen::Project,
            (Screen::Project, Nav::SettingsOpened) => Screen::Settings,
            (Screen::Settings, Nav::SettingsSaved | Nav::SettingsCancelled) => Screen::Project,
            (Screen::Project, Nav::LoggedOut) => Screen::Login,
            (current, _) => current,
        }
    }
}
