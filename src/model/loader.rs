//! Model artifact location.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the default model location.
pub const MODEL_ENV_VAR: &str = "LESIONSCAN_MODEL";

/// File name of the bundled classifier.
pub const MODEL_FILENAME: &str = "model.onnx";

/// Resolve where the model artifact should be loaded from.
///
/// Lookup order:
/// 1. `explicit`, when given
/// 2. the `LESIONSCAN_MODEL` environment variable
/// 3. the platform data directory:
///    - Windows: `%APPDATA%\lesionscan\model.onnx`
///    - Linux: `~/.local/share/lesionscan/model.onnx`
///    - macOS: `~/Library/Application Support/lesionscan/model.onnx`
///
/// The path is not checked for existence; loading reports a missing file.
#[must_use]
pub fn resolve_model_path(explicit: Option<&Path>) -> PathBuf {
    resolve_with(explicit, std::env::var_os(MODEL_ENV_VAR).map(PathBuf::from))
}

fn resolve_with(explicit: Option<&Path>, from_env: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        tracing::debug!("Using model path from {MODEL_ENV_VAR}: {}", path.display());
        return path;
    }

    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("lesionscan").join(MODEL_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_with(
            Some(Path::new("custom.onnx")),
            Some(PathBuf::from("env.onnx")),
        );
        assert_eq!(path, PathBuf::from("custom.onnx"));
    }

    #[test]
    fn test_env_path_used() {
        let path = resolve_with(None, Some(PathBuf::from("env.onnx")));
        assert_eq!(path, PathBuf::from("env.onnx"));
    }

    #[test]
    fn test_default_location() {
        let path = resolve_with(None, Some(PathBuf::new()));
        assert!(path.ends_with(Path::new("lesionscan").join(MODEL_FILENAME)));
    }
}
