//! Upload path resolution.
//!
//! Client-supplied filenames are never trusted. [`sanitise_filename`] reduces a name to a
//! conservative ASCII subset so that the result can be joined onto the upload directory
//! without escaping it, and [`upload_path`] is the single place where that join happens.

use crate::constants::{UPLOADS_URL_PREFIX, WINDOWS_DEVICE_NAMES};
use crate::FilesError;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Reduces a client-supplied filename to a safe storage key.
///
/// The rules are applied in order:
/// - the name is NFKD-normalised and what is still non-ASCII is dropped, so `é` keeps its `e`
/// - path separators (`/` and `\`) become spaces
/// - runs of whitespace collapse into a single `_`
/// - anything outside `[A-Za-z0-9_.-]` is removed
/// - leading and trailing `.` and `_` are trimmed
/// - on Windows, device names (`CON`, `NUL`, `COM1`, ...) get a `_` prefix
///
/// # Errors
///
/// Returns `FilesError::InvalidFilename` if nothing is left after sanitisation.
pub fn sanitise_filename(filename: &str) -> Result<String, FilesError> {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return Err(FilesError::InvalidFilename(filename.to_owned()));
    }

    if cfg!(windows) && is_device_name(trimmed) {
        return Ok(format!("_{trimmed}"));
    }

    Ok(trimmed.to_owned())
}

fn is_device_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or_default();
    WINDOWS_DEVICE_NAMES
        .iter()
        .any(|device| device.eq_ignore_ascii_case(stem))
}

/// Resolves a path inside the upload directory.
///
/// With no filename this is `base_dir` itself. Otherwise the filename is sanitised and
/// joined onto `base_dir`, so the result is always a direct child of the directory.
///
/// # Errors
///
/// Returns `FilesError::InvalidFilename` if the filename sanitises to nothing.
pub fn upload_path(base_dir: &Path, filename: Option<&str>) -> Result<PathBuf, FilesError> {
    match filename {
        None => Ok(base_dir.to_path_buf()),
        Some(name) => Ok(base_dir.join(sanitise_filename(name)?)),
    }
}

/// Public retrieval URL for a stored blob, e.g. `/uploads/song1.mp3`.
pub fn public_path(sanitised_name: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}/{sanitised_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitise_keeps_plain_names() {
        assert_eq!(sanitise_filename("test.txt").unwrap(), "test.txt");
        assert_eq!(sanitise_filename("song-1_final.mp3").unwrap(), "song-1_final.mp3");
    }

    #[test]
    fn test_sanitise_joins_whitespace_with_underscores() {
        assert_eq!(
            sanitise_filename("My cool   movie.mov").unwrap(),
            "My_cool_movie.mov"
        );
    }

    #[test]
    fn test_sanitise_strips_traversal() {
        assert_eq!(
            sanitise_filename("../../../etc/passwd").unwrap(),
            "etc_passwd"
        );
        assert_eq!(
            sanitise_filename("..\\windows\\win.ini").unwrap(),
            "windows_win.ini"
        );
    }

    #[test]
    fn test_sanitise_drops_non_ascii_and_specials() {
        assert_eq!(sanitise_filename("a$b%c!.wav").unwrap(), "abc.wav");
        assert_eq!(sanitise_filename("日本語").ok(), None);
    }

    #[test]
    fn test_sanitise_keeps_base_letters_of_accented_names() {
        assert_eq!(sanitise_filename("Café.mp3").unwrap(), "Cafe.mp3");
        assert_eq!(sanitise_filename("ééé.mp3").unwrap(), "eee.mp3");
        assert_eq!(
            sanitise_filename("chanson d'été.ogg").unwrap(),
            "chanson_dete.ogg"
        );
    }

    #[test]
    fn test_device_names_are_recognised() {
        assert!(is_device_name("con.txt"));
        assert!(is_device_name("LPT1"));
        assert!(!is_device_name("console.txt"));
    }

    #[test]
    fn test_sanitise_prefixes_device_names_only_on_windows() {
        let expected = if cfg!(windows) { "_con.mp3" } else { "con.mp3" };
        assert_eq!(sanitise_filename("con.mp3").unwrap(), expected);
        assert_eq!(sanitise_filename("console.txt").unwrap(), "console.txt");
    }

    #[test]
    fn test_sanitise_rejects_names_with_nothing_left() {
        for name in ["", "   ", "..", "/", "._.", "日本"] {
            let err = sanitise_filename(name).expect_err("should reject");
            assert!(matches!(err, FilesError::InvalidFilename(_)), "{name:?}");
        }
    }

    #[test]
    fn test_upload_path_without_filename_is_base_dir() {
        let base = Path::new("/srv/uploads");
        assert_eq!(upload_path(base, None).unwrap(), base);
    }

    #[test]
    fn test_upload_path_stays_inside_base_dir() {
        let base = Path::new("/srv/uploads");
        let path = upload_path(base, Some("../../secret key.pem")).unwrap();
        assert_eq!(path, base.join("secret_key.pem"));
        assert_eq!(path.parent(), Some(base));
    }

    #[test]
    fn test_public_path() {
        assert_eq!(public_path("test.txt"), "/uploads/test.txt");
    }
}
