//! Shell Router
//!
//! Maps the shell's paths to screens. Only the dashboard takes a parameter,
//! the `company` query value, which is passed through undecided: the
//! dashboard applies its own blank-filter policy.

use serde::Serialize;
use thiserror::Error;

/// Default mount point of the shell
pub const DEFAULT_BASE_PATH: &str = "/feedbacksystem";

/// The shell's screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Home,
    Feedback,
    Dashboard,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Home, Screen::Feedback, Screen::Dashboard];

    /// Path relative to the base path
    pub fn path(&self) -> &'static str {
        match self {
            Screen::Home => "/",
            Screen::Feedback => "/feedback",
            Screen::Dashboard => "/dashboard",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Feedback => "Submit Feedback",
            Screen::Dashboard => "Dashboard",
        }
    }
}

/// A resolved path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub screen: Screen,
    /// Raw `company` query value, percent-decoded
    pub company: Option<String>,
}

/// Routing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No screen for path: {0}")]
    NotFound(String),

    #[error("Path {path} is outside the base path {base}")]
    OutsideBase { path: String, base: String },
}

/// Path-to-screen table under a base path
#[derive(Debug, Clone)]
pub struct Router {
    base_path: String,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PATH)
    }
}

impl Router {
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_end_matches('/');
        let base_path = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Full path for a screen, including the base path
    pub fn href(&self, screen: Screen) -> String {
        match screen {
            Screen::Home => format!("{}/", self.base_path),
            other => format!("{}{}", self.base_path, other.path()),
        }
    }

    /// Dashboard link scoped to a company
    pub fn dashboard_href(&self, company: &str) -> String {
        format!(
            "{}?company={}",
            self.href(Screen::Dashboard),
            urlencoding::encode(company)
        )
    }

    /// Resolve a path (with optional query string) to a screen.
    ///
    /// Paths may be given with or without the base path prefix.
    pub fn resolve(&self, target: &str) -> Result<Route, RouteError> {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        let relative = self.strip_base(path)?;
        let relative = relative.trim_end_matches('/');

        let screen = match relative {
            "" => Screen::Home,
            "/feedback" => Screen::Feedback,
            "/dashboard" => Screen::Dashboard,
            _ => return Err(RouteError::NotFound(path.to_string())),
        };

        let company = match screen {
            Screen::Dashboard => query.and_then(company_param),
            _ => None,
        };

        Ok(Route { screen, company })
    }

    fn strip_base<'a>(&self, path: &'a str) -> Result<&'a str, RouteError> {
        if self.base_path.is_empty() {
            return Ok(path);
        }

        match path.strip_prefix(self.base_path.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => Ok(rest),
            // Relative screen paths are accepted as-is
            _ if Screen::ALL
                .iter()
                .any(|s| path.trim_end_matches('/') == s.path().trim_end_matches('/')) =>
            {
                Ok(path)
            }
            _ => Err(RouteError::OutsideBase {
                path: path.to_string(),
                base: self.base_path.clone(),
            }),
        }
    }
}

fn company_param(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != "company" {
            return None;
        }
        let value = value.replace('+', " ");
        let decoded = urlencoding::decode(&value)
            .map(|v| v.into_owned())
            .unwrap_or(value);
        Some(decoded)
    })
}
