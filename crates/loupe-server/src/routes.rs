//! HTTP surface of the bridge server: the open-in-editor root endpoint
//! and the source-context endpoint. CORS-open so the overlay can call in
//! from any origin.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use loupe_core::{PathType, SourceContext};

use crate::launch::{EditorLauncher, LaunchRequest};
use crate::options::{Hooks, ServerOptions};
use crate::project;

/// Shared request state. `root` is computed once at startup and read-only
/// afterwards; handlers share nothing else mutable.
pub struct AppState {
    pub options: ServerOptions,
    pub root: Option<PathBuf>,
    pub launcher: Arc<dyn EditorLauncher>,
    pub hooks: Hooks,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/", get(open_in_editor))
        .route("/source", get(source_context))
        .layer(cors)
        .with_state(state)
}

fn default_line() -> usize {
    1
}

fn default_context_lines() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct SourceQuery {
    #[serde(default)]
    file: String,
    #[serde(default = "default_line")]
    line: usize,
    #[serde(rename = "contextLines", default = "default_context_lines")]
    context_lines: usize,
}

/// `GET /source?file&line[&contextLines]`
///
/// Returns a window of `2 * contextLines + 1` lines centered on `line`,
/// clamped to the file, or `null` when the file is missing or unreadable.
/// Never errors to the transport layer.
async fn source_context(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SourceQuery>,
) -> Json<Option<SourceContext>> {
    let path = project::resolve_file(state.root.as_deref(), &query.file);
    let context = match tokio::fs::read_to_string(&path).await {
        Ok(content) => Some(SourceContext::from_content(
            &content,
            query.line,
            query.context_lines,
        )),
        Err(err) => {
            tracing::debug!(file = %path.display(), %err, "no source context");
            None
        }
    };
    Json(context)
}

fn default_position() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct OpenQuery {
    #[serde(default)]
    file: String,
    #[serde(default = "default_position")]
    line: u32,
    #[serde(default = "default_position")]
    column: u32,
}

/// `GET /?file&line&column`
///
/// Acknowledges immediately and launches the editor as a detached side
/// effect. In relative-path mode a resolved path escaping the project
/// root is rejected with 403 before any launch.
async fn open_in_editor(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OpenQuery>,
) -> Response {
    let path = project::resolve_file(state.root.as_deref(), &query.file);

    if state.options.path_type == PathType::Relative
        && let Some(root) = &state.root
        && !project::contains(root, &path)
    {
        tracing::warn!(file = %path.display(), root = %root.display(), "rejected path outside project root");
        return (StatusCode::FORBIDDEN, "not allowed to open this file").into_response();
    }

    let request = LaunchRequest {
        file: path,
        line: query.line,
        column: query.column,
        editor: state.options.editor.clone(),
        open_in: state.options.open_in.clone(),
        path_format: state.options.path_format.clone(),
        root_dir: state.root.clone(),
    };
    let launcher = Arc::clone(&state.launcher);
    let hooks = state.hooks.clone();
    // Launch after responding; completion never affects the response.
    tokio::spawn(async move {
        if let Some(hook) = &hooks.after_inspect_request {
            hook(&request);
        }
        launcher.launch(request);
    });

    (StatusCode::OK, "ok").into_response()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, header};
    use parking_lot::Mutex;
    use tower::ServiceExt;

    use super::*;

    #[derive(Default)]
    struct RecordingLauncher {
        launched: Mutex<Vec<LaunchRequest>>,
    }

    impl EditorLauncher for RecordingLauncher {
        fn launch(&self, request: LaunchRequest) {
            self.launched.lock().push(request);
        }
    }

    fn test_state(
        path_type: PathType,
        root: Option<PathBuf>,
    ) -> (Arc<AppState>, Arc<RecordingLauncher>) {
        let launcher = Arc::new(RecordingLauncher::default());
        let state = Arc::new(AppState {
            options: ServerOptions {
                path_type,
                ..ServerOptions::default()
            },
            root,
            launcher: launcher.clone(),
            hooks: Hooks::default(),
        });
        (state, launcher)
    }

    async fn get_response(app: Router, uri: &str) -> (StatusCode, http::HeaderMap, String) {
        let response = app
            .oneshot(
                Request::get(uri)
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn cors_origin(headers: &http::HeaderMap) -> Option<&str> {
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_open_rejects_traversal_in_relative_mode() {
        let (state, launcher) = test_state(PathType::Relative, Some(PathBuf::from("/repo")));
        let (status, headers, body) =
            get_response(router(state), "/?file=../../etc/passwd&line=1&column=1").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "not allowed to open this file");
        // The denial response still carries CORS headers.
        assert_eq!(cors_origin(&headers), Some("*"));
        assert!(launcher.launched.lock().is_empty());
    }

    #[tokio::test]
    async fn test_open_under_root_acknowledges_and_launches() {
        let (state, launcher) = test_state(PathType::Relative, Some(PathBuf::from("/repo")));
        let (status, _, body) =
            get_response(router(state), "/?file=src/a.ts&line=10&column=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");

        // The launch is a detached side effect of the handled request.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let launched = launcher.launched.lock();
        assert_eq!(launched.len(), 1);
        assert_eq!(launched[0].file, PathBuf::from("/repo/src/a.ts"));
        assert_eq!(launched[0].line, 10);
        assert_eq!(launched[0].column, 2);
    }

    #[tokio::test]
    async fn test_open_absolute_mode_skips_containment() {
        let (state, launcher) = test_state(PathType::Absolute, Some(PathBuf::from("/repo")));
        let (status, _, _) =
            get_response(router(state), "/?file=/elsewhere/b.ts&line=1&column=1").await;
        assert_eq!(status, StatusCode::OK);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(launcher.launched.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_source_returns_clamped_window() {
        let path = std::env::temp_dir().join("loupe-routes-source-test.txt");
        std::fs::write(&path, "one\ntwo\nthree").unwrap();

        let (state, _) = test_state(PathType::Absolute, None);
        let uri = format!("/source?file={}&line=2&contextLines=5", path.display());
        let (status, headers, body) = get_response(router(state), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors_origin(&headers), Some("*"));
        let context: SourceContext = serde_json::from_str(&body).unwrap();
        assert_eq!(context.start_line, 1);
        assert_eq!(context.lines, vec!["one", "two", "three"]);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_source_missing_file_is_null() {
        let (state, _) = test_state(PathType::Absolute, None);
        let (status, _, body) = get_response(
            router(state),
            "/source?file=/definitely/not/here.ts&line=3",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "null");
    }

    #[tokio::test]
    async fn test_source_resolves_relative_to_root() {
        let root = std::env::temp_dir().join("loupe-routes-root-test");
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("src/lib.rs"), "fn main() {}\n").unwrap();

        let (state, _) = test_state(PathType::Relative, Some(root.clone()));
        let (_, _, body) = get_response(router(state), "/source?file=src/lib.rs&line=1").await;
        let context: SourceContext = serde_json::from_str(&body).unwrap();
        assert_eq!(context.lines, vec!["fn main() {}"]);

        std::fs::remove_dir_all(&root).ok();
    }
}
