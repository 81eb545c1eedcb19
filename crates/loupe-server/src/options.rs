//! Bridge-server configuration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use loupe_core::PathType;
use loupe_core::config::DEFAULT_PORT;

use crate::launch::LaunchRequest;

/// Server options, usually filled in by the build-plugin glue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerOptions {
    /// Preferred port; negotiation scans upward from here.
    pub port: u16,
    /// Relative mode enables the path-containment check.
    pub path_type: PathType,
    /// Editor passed through to the launch operation.
    pub editor: Option<String>,
    pub open_in: Option<String>,
    pub path_format: Option<String>,
    /// Host advertised in the startup banner.
    pub ip: Option<String>,
    /// Print the startup banner once listening.
    pub print_server: bool,
    /// Overrides git-derived project-root detection.
    pub root_dir: Option<PathBuf>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            path_type: PathType::default(),
            editor: None,
            open_in: None,
            path_format: None,
            ip: None,
            print_server: false,
            root_dir: None,
        }
    }
}

impl ServerOptions {
    /// Options from `LOUPE_*` environment variables, defaults elsewhere.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(port) = env_var("LOUPE_PORT").and_then(|v| v.parse().ok()) {
            options.port = port;
        }
        if env_var("LOUPE_PATH_TYPE").as_deref() == Some("relative") {
            options.path_type = PathType::Relative;
        }
        options.editor = env_var("LOUPE_EDITOR");
        options.ip = env_var("LOUPE_IP");
        options.print_server = env_var("LOUPE_PRINT_SERVER").as_deref() == Some("1");
        options.root_dir = env_var("LOUPE_ROOT_DIR").map(PathBuf::from);
        options
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Lifecycle hook invoked after an inspect request is accepted, before the
/// editor launch is handed off.
pub type AfterInspectRequest = Arc<dyn Fn(&LaunchRequest) + Send + Sync>;

/// Optional lifecycle hooks.
#[derive(Clone, Default)]
pub struct Hooks {
    pub after_inspect_request: Option<AfterInspectRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_json_round_trip() {
        let options: ServerOptions =
            serde_json::from_str(r#"{"port":6001,"pathType":"relative","printServer":true}"#)
                .unwrap();
        assert_eq!(options.port, 6001);
        assert_eq!(options.path_type, PathType::Relative);
        assert!(options.print_server);
        assert_eq!(options.editor, None);
    }

    #[test]
    fn test_default_port_matches_client() {
        assert_eq!(ServerOptions::default().port, DEFAULT_PORT);
    }
}
