//! Client-facing configuration for the inspector overlay.

use serde::{Deserialize, Serialize};

use crate::keys::{KeyCombo, ModeConfig, TrackAction};
use crate::source::ElementInfo;

/// Preferred bridge-server port; negotiation scans upward from here.
pub const DEFAULT_PORT: u16 = 5678;

/// Default template for copied locations.
pub const DEFAULT_COPY_FORMAT: &str = "{file}:{line}:{column}";

/// Whether paths are sent to the server (and copied) relative to the
/// project root or absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    Relative,
    #[default]
    Absolute,
}

/// Transport used for locate/target requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendType {
    /// Fetch expecting a response body.
    #[default]
    Xhr,
    /// Fire-and-forget pixel beacon.
    Img,
}

/// Overlay configuration, usually injected as JSON by the build plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectorConfig {
    /// Base tracking combo, e.g. `"shift+alt"`.
    pub hot_keys: String,
    /// Optional mode-specific combos; empty string disables the override.
    pub copy_keys: String,
    pub locate_keys: String,
    pub target_keys: String,
    pub default_action: TrackAction,
    pub copy: bool,
    pub locate: bool,
    pub target: bool,
    /// Template for copied text; `{file}`, `{line}` and `{column}` expand.
    pub copy_format: String,
    pub path_type: PathType,
    pub port: u16,
    pub ip: String,
    pub send_type: SendType,
    /// Fetch a source-line preview into the hover tooltip.
    pub show_source_context: bool,
    /// Suppress the startup console tip.
    pub hide_console: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            hot_keys: "shift+alt".into(),
            copy_keys: String::new(),
            locate_keys: String::new(),
            target_keys: String::new(),
            default_action: TrackAction::All,
            copy: true,
            locate: true,
            target: true,
            copy_format: DEFAULT_COPY_FORMAT.into(),
            path_type: PathType::Absolute,
            port: DEFAULT_PORT,
            ip: "localhost".into(),
            send_type: SendType::Xhr,
            show_source_context: true,
            hide_console: false,
        }
    }
}

impl InspectorConfig {
    /// Parsed key configuration for the mode resolver.
    pub fn mode_config(&self) -> ModeConfig {
        ModeConfig {
            hot_keys: KeyCombo::parse(&self.hot_keys),
            copy_keys: KeyCombo::parse(&self.copy_keys),
            locate_keys: KeyCombo::parse(&self.locate_keys),
            target_keys: KeyCombo::parse(&self.target_keys),
            default_action: self.default_action,
            copy_enabled: self.copy,
            locate_enabled: self.locate,
            target_enabled: self.target,
        }
    }

    /// Base URL of the bridge server.
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.ip, self.port)
    }
}

/// Expands a copy template for the given element.
pub fn format_copy_text(template: &str, info: &ElementInfo) -> String {
    template
        .replace("{file}", &info.source.path)
        .replace("{line}", &info.source.line.to_string())
        .replace("{column}", &info.source.column.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceInfo;

    fn sample() -> ElementInfo {
        ElementInfo {
            source: SourceInfo {
                name: "App".into(),
                path: "src/App.vue".into(),
                line: 3,
                column: 9,
            },
            width: 0.0,
            height: 0.0,
            text_content: None,
        }
    }

    #[test]
    fn test_defaults_round_trip() {
        let config = InspectorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: InspectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: InspectorConfig =
            serde_json::from_str(r#"{"hotKeys":"ctrl+shift","pathType":"relative"}"#).unwrap();
        assert_eq!(config.hot_keys, "ctrl+shift");
        assert_eq!(config.path_type, PathType::Relative);
        assert_eq!(config.send_type, SendType::Xhr);
    }

    #[test]
    fn test_copy_template_expansion() {
        assert_eq!(
            format_copy_text(DEFAULT_COPY_FORMAT, &sample()),
            "src/App.vue:3:9"
        );
        assert_eq!(
            format_copy_text("{file}#L{line}", &sample()),
            "src/App.vue#L3"
        );
    }

    #[test]
    fn test_server_url() {
        let config = InspectorConfig::default();
        assert_eq!(config.server_url(), "http://localhost:5678");
    }
}
