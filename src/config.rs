use std::path::{Path, PathBuf};

use crate::commands::OutputFormat;

/// Rows dumped per table unless `--limit` says otherwise.
pub const DEFAULT_ROW_LIMIT: usize = 5;

/// Store files checked when no paths are given, relative to the home directory.
const DEFAULT_STORES: &[&str] = &[
    ".stitch-mcp/config/access_tokens.db",
    ".stitch-mcp/config/credentials.db",
    ".stitch-mcp/config/default_configs.db",
];

#[derive(Debug, Clone, PartialEq)]
pub struct InspectConfig {
    pub paths: Vec<String>,
    pub limit: usize,
    pub format: OutputFormat,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            limit: DEFAULT_ROW_LIMIT,
            format: OutputFormat::default(),
        }
    }
}

impl InspectConfig {
    /// Merges command-line values over the defaults. An empty path list
    /// falls back to the built-in stores.
    pub fn resolve(paths: Vec<String>, limit: Option<usize>, format: OutputFormat) -> Self {
        let paths = if paths.is_empty() { default_paths() } else { paths };
        Self {
            paths,
            limit: limit.unwrap_or(DEFAULT_ROW_LIMIT),
            format,
        }
    }
}

pub fn default_paths() -> Vec<String> {
    match dirs::home_dir() {
        Some(home) => paths_under(&home),
        None => {
            tracing::warn!("could not determine home directory; no default stores");
            Vec::new()
        }
    }
}

fn paths_under(home: &Path) -> Vec<String> {
    DEFAULT_STORES
        .iter()
        .map(|rel| {
            let path: PathBuf = rel.split('/').fold(home.to_path_buf(), |acc, part| acc.join(part));
            path.to_string_lossy().into_owned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_under_home() {
        let home = Path::new("/home/someone");
        let paths = paths_under(home);
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("access_tokens.db"));
        assert!(paths[2].ends_with("default_configs.db"));
        assert!(paths.iter().all(|p| p.starts_with("/home/someone")));
    }

    #[test]
    fn explicit_paths_win() {
        let config = InspectConfig::resolve(vec!["a.db".into()], Some(2), OutputFormat::Json);
        assert_eq!(config.paths, vec!["a.db"]);
        assert_eq!(config.limit, 2);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn missing_limit_uses_default() {
        let config = InspectConfig::resolve(vec!["a.db".into()], None, OutputFormat::Text);
        assert_eq!(config.limit, DEFAULT_ROW_LIMIT);
    }
}
