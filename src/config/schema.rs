use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub deletion: DeletionSettings,
    pub lyrics: LyricsSettings,
}

/// Default ceiling on the rendered selection clause, in bytes.
///
/// Matches SQLite's default `SQLITE_MAX_SQL_LENGTH`.
pub const DEFAULT_MAX_QUERY_BYTES: usize = 1_000_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeletionSettings {
    /// Upper bound on the byte length of one `<id_column> IN (...)` clause.
    /// Batch sizes are derived from it.
    pub max_query_bytes: usize,
    /// Column name rendered into the selection clause.
    pub id_column: String,
}

impl Default for DeletionSettings {
    fn default() -> Self {
        Self {
            max_query_bytes: DEFAULT_MAX_QUERY_BYTES,
            id_column: "_id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LyricsSettings {
    /// Extension of timestamped sidecar files (case-insensitive, without dot).
    pub synced_extension: String,
    /// Extension of plain-text sidecar files (case-insensitive, without dot).
    pub plain_extension: String,
    /// Whether symlinked sidecar files are considered.
    pub follow_links: bool,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            synced_extension: "lrc".to_string(),
            plain_extension: "txt".to_string(),
            follow_links: true,
        }
    }
}
