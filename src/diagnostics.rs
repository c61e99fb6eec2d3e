//! Best-effort artifacts for responses we could not decode.
use std::fs;
use std::path::{Path, PathBuf};

pub const DUMP_FILE_NAME: &str = "resposta_api.txt";
pub const PREVIEW_CHARS: usize = 500;

pub fn default_dump_path() -> PathBuf {
    std::env::temp_dir().join(DUMP_FILE_NAME)
}

/// Write `raw` to `path`. Returns `None` when the dump could not be saved.
pub fn dump_raw_response(raw: &str, path: &Path) -> Option<PathBuf> {
    match fs::write(path, raw) {
        Ok(()) => Some(path.to_path_buf()),
        Err(e) => {
            tracing::warn!("could not save response dump to {}: {}", path.display(), e);
            None
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `raw`.
pub fn preview(raw: &str) -> &str {
    match raw.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let raw = "ç".repeat(600);
        let p = preview(&raw);
        assert_eq!(p.chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_dump_writes_raw_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DUMP_FILE_NAME);

        let saved = dump_raw_response("<html>oops</html>", &path);

        assert_eq!(saved.as_deref(), Some(path.as_path()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html>oops</html>");
    }

    #[test]
    fn test_dump_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join(DUMP_FILE_NAME);
        assert!(dump_raw_response("x", &path).is_none());
    }
}
