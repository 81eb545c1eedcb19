//! Editor-launch seam.
//!
//! The actual "open in editor" mechanism is an external collaborator; the
//! server only hands it a [`LaunchRequest`] and never awaits completion.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Serialize;

/// Default command template; `{editor}`, `{file}`, `{line}` and `{column}`
/// expand per request.
pub const DEFAULT_LAUNCH_TEMPLATE: &str = "{editor} --goto {file}:{line}:{column}";

/// Everything the external open-in-editor operation needs.
///
/// `open_in` is carried for richer launchers (editor tab/window choice);
/// the command launcher ignores it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRequest {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub editor: Option<String>,
    pub open_in: Option<String>,
    pub path_format: Option<String>,
    pub root_dir: Option<PathBuf>,
}

/// Opaque editor-launch operation, invoked after the HTTP response is
/// already sent. Fire-and-forget: failures are logged, never surfaced.
pub trait EditorLauncher: Send + Sync {
    fn launch(&self, request: LaunchRequest);
}

/// Launches the editor by expanding a command template and spawning it
/// detached. Placeholders are expanded per argument token, so paths with
/// spaces stay a single argument.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    template: String,
}

impl CommandLauncher {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }
}

impl Default for CommandLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_LAUNCH_TEMPLATE)
    }
}

impl EditorLauncher for CommandLauncher {
    fn launch(&self, request: LaunchRequest) {
        // "relative" path format hands the editor a path relative to the
        // project root; anything else passes the resolved path through.
        let file = match request.path_format.as_deref() {
            Some("relative") => {
                crate::project::relative_path(request.root_dir.as_deref(), &request.file)
            }
            _ => request.file.clone(),
        };
        let file = file.display().to_string();
        let mut parts = self
            .template
            .split_whitespace()
            .map(|token| expand(token, &request, &file));
        let Some(program) = parts.next() else {
            return;
        };
        let args: Vec<String> = parts.collect();

        let mut command = Command::new(&program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = &request.root_dir {
            command.current_dir(dir);
        }

        match command.spawn() {
            Ok(_) => tracing::info!(
                file = %request.file.display(),
                line = request.line,
                column = request.column,
                "launching editor"
            ),
            Err(err) => tracing::warn!(%program, %err, "editor launch failed"),
        }
    }
}

fn expand(token: &str, request: &LaunchRequest, file: &str) -> String {
    token
        .replace("{editor}", request.editor.as_deref().unwrap_or("code"))
        .replace("{file}", file)
        .replace("{line}", &request.line.to_string())
        .replace("{column}", &request.column.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LaunchRequest {
        LaunchRequest {
            file: PathBuf::from("/repo/src/a.ts"),
            line: 12,
            column: 3,
            editor: None,
            open_in: None,
            path_format: None,
            root_dir: None,
        }
    }

    #[test]
    fn test_default_template_expansion() {
        let req = request();
        let file = req.file.display().to_string();
        let expanded: Vec<String> = DEFAULT_LAUNCH_TEMPLATE
            .split_whitespace()
            .map(|token| expand(token, &req, &file))
            .collect();
        assert_eq!(expanded, vec!["code", "--goto", "/repo/src/a.ts:12:3"]);
    }

    #[test]
    fn test_configured_editor_overrides_default() {
        let mut req = request();
        req.editor = Some("cursor".into());
        assert_eq!(expand("{editor}", &req, ""), "cursor");
    }
}
