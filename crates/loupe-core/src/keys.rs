//! Keyboard state tracking and interaction-mode resolution.
//!
//! The held-key set is an explicit state machine (`down` / `up` / `clear`)
//! and mode resolution is a pure function over it, so both test natively
//! with no event wiring.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The single interaction intent active at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Copy the resolved source path to the clipboard.
    Copy,
    /// Ask the bridge server to open the file in the editor.
    Locate,
    /// Send the location to a configured external target.
    Target,
}

/// Configured fallback when only the base tracking combo is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackAction {
    Copy,
    Locate,
    Target,
    /// Any enabled action; resolves to the first of copy, locate, target.
    #[default]
    All,
}

/// One parsed key combination such as `"shift+altKey"`.
///
/// Key names are normalized: trimmed, lowercased, with the `Key` suffix of
/// DOM modifier names (`altKey`, `metaKey`) stripped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyCombo {
    keys: Vec<String>,
}

impl KeyCombo {
    pub fn parse(spec: &str) -> Self {
        let keys = spec
            .split('+')
            .map(normalize_key)
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True when every key of the combo is currently held. An empty combo
    /// never matches.
    pub fn matches(&self, state: &KeyState) -> bool {
        !self.keys.is_empty() && self.keys.iter().all(|k| state.is_down(k))
    }
}

fn normalize_key(key: &str) -> String {
    let key = key.trim();
    let key = key.strip_suffix("Key").unwrap_or(key);
    key.to_ascii_lowercase()
}

/// Set of currently held keys.
///
/// `up` always removes, whether or not the key belongs to any configured
/// combo, so a missed keydown can never leave a key stuck.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: BTreeSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn down(&mut self, key: &str) {
        self.held.insert(normalize_key(key));
    }

    pub fn up(&mut self, key: &str) {
        self.held.remove(&normalize_key(key));
    }

    /// Window blur or an explicit cancel (Escape) drops everything.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.held.contains(&normalize_key(key))
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// Static key configuration feeding [`resolve_mode`].
#[derive(Debug, Clone)]
pub struct ModeConfig {
    /// Base tracking combo; holding it activates the default action.
    pub hot_keys: KeyCombo,
    pub copy_keys: KeyCombo,
    pub locate_keys: KeyCombo,
    pub target_keys: KeyCombo,
    pub default_action: TrackAction,
    pub copy_enabled: bool,
    pub locate_enabled: bool,
    pub target_enabled: bool,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            hot_keys: KeyCombo::parse("shift+alt"),
            copy_keys: KeyCombo::default(),
            locate_keys: KeyCombo::default(),
            target_keys: KeyCombo::default(),
            default_action: TrackAction::All,
            copy_enabled: true,
            locate_enabled: true,
            target_enabled: true,
        }
    }
}

/// Resolves the single active mode for the current key state.
///
/// Mode-specific combos are evaluated in fixed priority order
/// `target > locate > copy`; the first fully held combo wins. When none
/// match but the base `hot_keys` combo is held, the configured default
/// action applies. Otherwise tracking is inactive (`None`).
pub fn resolve_mode(state: &KeyState, config: &ModeConfig) -> Option<InteractionMode> {
    if config.target_enabled && config.target_keys.matches(state) {
        return Some(InteractionMode::Target);
    }
    if config.locate_enabled && config.locate_keys.matches(state) {
        return Some(InteractionMode::Locate);
    }
    if config.copy_enabled && config.copy_keys.matches(state) {
        return Some(InteractionMode::Copy);
    }
    if config.hot_keys.matches(state) {
        return default_mode(config);
    }
    None
}

/// The mode the configured default action maps to, honoring per-mode
/// enablement. `All` resolves to the first enabled of copy, locate,
/// target.
pub fn default_mode(config: &ModeConfig) -> Option<InteractionMode> {
    match config.default_action {
        TrackAction::Copy if config.copy_enabled => Some(InteractionMode::Copy),
        TrackAction::Locate if config.locate_enabled => Some(InteractionMode::Locate),
        TrackAction::Target if config.target_enabled => Some(InteractionMode::Target),
        TrackAction::All => [
            (config.copy_enabled, InteractionMode::Copy),
            (config.locate_enabled, InteractionMode::Locate),
            (config.target_enabled, InteractionMode::Target),
        ]
        .into_iter()
        .find_map(|(enabled, mode)| enabled.then_some(mode)),
        _ => None,
    }
}
