use serde::Serialize;

/// Well-known portal routes.
pub mod paths {
    pub const HOME: &str = "/";
    pub const PROPERTIES: &str = "/properties";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGIN: &str = "/auth/login";
    pub const TERMS: &str = "/terms";
    pub const PRIVACY: &str = "/privacy";
    pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
    pub const AGENT_DASHBOARD: &str = "/agent/dashboard";
    pub const TENANT_DASHBOARD: &str = "/tenant/dashboard";
}

/// Options accepted by [`Navigator::navigate_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    pub fn replace() -> Self {
        Self { replace: true }
    }
}

/// Router seam used by components that trigger navigation.
pub trait Navigator {
    fn navigate_to(&mut self, path: &str, options: NavigateOptions);
    fn navigate_back(&mut self);
}

/// A single navigation request captured by [`RecordingNavigator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    To { path: String, replace: bool },
    Back,
}

/// Navigator that records requests so a host can act on them after the component returns.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    requests: Vec<Navigation>,
}

impl RecordingNavigator {
    pub fn requests(&self) -> &[Navigation] {
        &self.requests
    }

    pub fn last(&self) -> Option<&Navigation> {
        self.requests.last()
    }

    pub fn back_count(&self) -> usize {
        self.requests
            .iter()
            .filter(|request| matches!(request, Navigation::Back))
            .count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&mut self, path: &str, options: NavigateOptions) {
        tracing::debug!(path, replace = options.replace, "navigation requested");
        self.requests.push(Navigation::To {
            path: path.to_string(),
            replace: options.replace,
        });
    }

    fn navigate_back(&mut self) {
        tracing::debug!("history back requested");
        self.requests.push(Navigation::Back);
    }
}
