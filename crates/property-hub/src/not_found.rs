//! Fallback view shown for unknown routes.

use serde::Serialize;

use crate::navigation::{paths, NavigateOptions, Navigator};

/// Copy rendered by the not-found page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundViewModel {
    pub status_code: u16,
    pub heading: &'static str,
    pub message: &'static str,
    pub back_label: &'static str,
    pub home_label: &'static str,
    pub home_href: &'static str,
}

/// Stateless "page not found" view offering back and home actions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotFoundView;

impl NotFoundView {
    pub fn new() -> Self {
        Self
    }

    /// Step one entry back in history.
    pub fn go_back<N: Navigator + ?Sized>(&self, navigator: &mut N) {
        navigator.navigate_back();
    }

    pub fn go_home<N: Navigator + ?Sized>(&self, navigator: &mut N) {
        navigator.navigate_to(self.home_href(), NavigateOptions::default());
    }

    pub fn home_href(&self) -> &'static str {
        paths::HOME
    }

    pub fn view(&self) -> NotFoundViewModel {
        NotFoundViewModel {
            status_code: 404,
            heading: "Page Not Found",
            message: "The page you are looking for might have been removed, had its name changed, or is temporarily unavailable.",
            back_label: "Go Back",
            home_label: "Go Home",
            home_href: self.home_href(),
        }
    }
}
