//! [`Searcher`] backed by the `rg` binary's JSON output.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::SearchError;
use crate::searcher::{SearchHit, Searcher};

/// Runs one `rg --json --fixed-strings` process per search.
#[derive(Debug, Clone)]
pub struct RipgrepSearcher {
    binary: String,
}

impl RipgrepSearcher {
    /// Creates a searcher invoking `binary` (a name on `PATH` or a full path).
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn unavailable(&self, err: std::io::Error) -> SearchError {
        SearchError::Unavailable {
            tool: self.binary.clone(),
            reason: err.to_string(),
        }
    }
}

impl Default for RipgrepSearcher {
    fn default() -> Self {
        Self::new("rg")
    }
}

#[async_trait]
impl Searcher for RipgrepSearcher {
    fn name(&self) -> &str {
        &self.binary
    }

    async fn probe(&self) -> Result<String, SearchError> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;
        if !output.status.success() {
            return Err(SearchError::Unavailable {
                tool: self.binary.clone(),
                reason: format!("`--version` exited with {}", output.status),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn search(&self, pattern: &str, scope: &Path) -> Result<Vec<SearchHit>, SearchError> {
        let output = self
            .command()
            .args(["--json", "--fixed-strings", "--no-messages", "--"])
            .arg(pattern)
            .arg(scope)
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;

        let status = output.status.code().unwrap_or(-1);
        match status {
            // 0: matches found, 1: no matches.
            0 | 1 => decode_json_lines(&output.stdout),
            // 2: an error occurred, possibly after some matches were printed.
            2 => {
                let hits = decode_json_lines(&output.stdout)?;
                if hits.is_empty() {
                    return Err(SearchError::Failed {
                        status,
                        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    });
                }
                tracing::warn!(
                    pattern,
                    scope = %scope.display(),
                    "search reported errors; keeping {} partial hits",
                    hits.len()
                );
                Ok(hits)
            }
            _ => Err(SearchError::Failed {
                status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct RgMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct RgMatch {
    path: RgText,
    lines: RgText,
    line_number: Option<u32>,
}

/// Either `{"text": ...}` or `{"bytes": ...}` for non-UTF-8 data.
#[derive(Deserialize)]
struct RgText {
    text: Option<String>,
}

/// Decodes `rg --json` output into hits.
///
/// Non-match messages and matches on non-UTF-8 paths or lines are skipped.
fn decode_json_lines(stdout: &[u8]) -> Result<Vec<SearchHit>, SearchError> {
    let stdout = std::str::from_utf8(stdout).map_err(|e| SearchError::Decode {
        reason: e.to_string(),
    })?;
    let mut hits = Vec::new();
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        let message: RgMessage = serde_json::from_str(line).map_err(|e| SearchError::Decode {
            reason: e.to_string(),
        })?;
        if message.kind != "match" {
            continue;
        }
        let Ok(m) = serde_json::from_value::<RgMatch>(message.data) else {
            tracing::debug!("skipping undecodable match record");
            continue;
        };
        let (Some(path), Some(text), Some(line)) = (m.path.text, m.lines.text, m.line_number)
        else {
            tracing::debug!("skipping non-UTF-8 match");
            continue;
        };
        hits.push(SearchHit {
            file: PathBuf::from(path),
            line,
            text: text.trim_end_matches(['\n', '\r']).to_string(),
        });
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{"type":"begin","data":{"path":{"text":"src/auth.rs"}}}
{"type":"match","data":{"path":{"text":"src/auth.rs"},"lines":{"text":"// @TEST:AUTH-100 login\n"},"line_number":12,"absolute_offset":100,"submatches":[]}}
{"type":"match","data":{"path":{"bytes":"c3JjL2JhZC5ycw=="},"lines":{"text":"// @TEST:AUTH-101\n"},"line_number":3,"absolute_offset":0,"submatches":[]}}
{"type":"end","data":{"path":{"text":"src/auth.rs"},"binary_offset":null,"stats":{}}}
{"type":"summary","data":{"elapsed_total":{"secs":0,"nanos":1},"stats":{}}}
"#;

    #[test]
    fn decodes_match_records() {
        let hits = decode_json_lines(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            hits,
            vec![SearchHit {
                file: PathBuf::from("src/auth.rs"),
                line: 12,
                text: "// @TEST:AUTH-100 login".to_string(),
            }]
        );
    }

    #[test]
    fn empty_output_is_no_hits() {
        assert!(decode_json_lines(b"").unwrap().is_empty());
    }

    #[test]
    fn garbage_output_is_decode_error() {
        let err = decode_json_lines(b"not json\n").unwrap_err();
        assert!(matches!(err, SearchError::Decode { .. }));
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let searcher = RipgrepSearcher::new("tagtrace-no-such-binary-7f3a");
        let err = searcher.probe().await.unwrap_err();
        assert!(matches!(err, SearchError::Unavailable { .. }));
        let err = searcher
            .search("@TEST:", Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Unavailable { .. }));
    }
}
