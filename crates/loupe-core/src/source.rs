//! Source-location data model shared by the overlay client and the bridge
//! server, plus the line-window math behind `GET /source`.

use serde::{Deserialize, Serialize};

/// Originating source location of one rendered element.
///
/// Immutable once computed for a given hover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Component or tag name, for display only.
    pub name: String,
    /// File path as injected by the build tooling (relative or absolute).
    pub path: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

/// Point-in-time snapshot of a hovered element: its source location plus
/// rendered size. Recomputed on every pointer move, no identity beyond the
/// current hover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    #[serde(flatten)]
    pub source: SourceInfo,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

impl ElementInfo {
    /// Path formatted as `path:line:column`.
    pub fn path_with_position(&self) -> String {
        format!(
            "{}:{}:{}",
            self.source.path, self.source.line, self.source.column
        )
    }
}

/// Wire payload of `GET /source`: a window of file lines centered on the
/// requested line, plus the absolute 1-based number of the first returned
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContext {
    pub lines: Vec<String>,
    pub start_line: usize,
}

impl SourceContext {
    /// Extracts the context window around `line` from raw file content.
    pub fn from_content(content: &str, line: usize, context_lines: usize) -> Self {
        let all: Vec<&str> = content.lines().collect();
        let (start, end) = context_window(all.len(), line, context_lines);
        let lines = if start > end {
            Vec::new()
        } else {
            all[start - 1..end].iter().map(|s| (*s).to_string()).collect()
        };
        Self { lines, start_line: start }
    }
}

/// 1-based inclusive window of at most `2 * context_lines + 1` lines
/// centered on `line`, clamped to `[1, total_lines]`.
///
/// Returns `(start, end)`; `start > end` means the window is empty (only
/// possible for an empty file).
pub fn context_window(total_lines: usize, line: usize, context_lines: usize) -> (usize, usize) {
    let line = line.max(1);
    let start = line.saturating_sub(context_lines).max(1);
    let end = line.saturating_add(context_lines).min(total_lines);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clamps_to_short_file() {
        // A 3-line file with line=2, radius=5 yields the whole file, not 11 lines.
        assert_eq!(context_window(3, 2, 5), (1, 3));
    }

    #[test]
    fn test_window_centered_in_long_file() {
        assert_eq!(context_window(100, 50, 5), (45, 55));
    }

    #[test]
    fn test_window_clamps_at_file_start_and_end() {
        assert_eq!(context_window(100, 2, 5), (1, 7));
        assert_eq!(context_window(100, 99, 5), (94, 100));
    }

    #[test]
    fn test_window_of_empty_file_is_empty() {
        let (start, end) = context_window(0, 1, 5);
        assert!(start > end);
    }

    #[test]
    fn test_context_from_content() {
        let ctx = SourceContext::from_content("a\nb\nc", 2, 5);
        assert_eq!(ctx.start_line, 1);
        assert_eq!(ctx.lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_context_from_empty_content() {
        let ctx = SourceContext::from_content("", 1, 5);
        assert!(ctx.lines.is_empty());
    }

    #[test]
    fn test_source_context_wire_shape() {
        let ctx = SourceContext { lines: vec!["x".into()], start_line: 7 };
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["startLine"], 7);
        assert_eq!(json["lines"][0], "x");
    }

    #[test]
    fn test_path_with_position() {
        let info = ElementInfo {
            source: SourceInfo {
                name: "Button".into(),
                path: "src/Button.tsx".into(),
                line: 12,
                column: 4,
            },
            width: 80.0,
            height: 24.0,
            text_content: None,
        };
        assert_eq!(info.path_with_position(), "src/Button.tsx:12:4");
    }
}
