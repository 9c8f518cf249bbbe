use std::path::Path;

use tracing::debug;

use crate::consts::TERMINATION_MARKER;

/// Whether the run log shows the launcher's closing footer.
///
/// Any failure to read the file counts as "still running"; the file is
/// reread from scratch on every call.
pub async fn detect_termination(path: &Path) -> bool {
    match tokio::fs::read(path).await {
        Ok(bytes) => footer_reached(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "run log not readable yet");
            false
        }
    }
}

/// True iff the second-to-last line carries the termination marker.
pub fn footer_reached(text: &str) -> bool {
    text.lines()
        .rev()
        .nth(1)
        .is_some_and(|line| line.contains(TERMINATION_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_not_terminated() {
        assert!(!footer_reached(""));
    }

    #[test]
    fn single_line_is_not_terminated() {
        assert!(!footer_reached("Good bye from Longbow!\n"));
    }

    #[test]
    fn marker_on_second_to_last_line() {
        let text = "submitting\nLongbow: Good bye from Longbow! \nbye\n";
        assert!(footer_reached(text));
    }

    #[test]
    fn marker_on_last_line_only() {
        assert!(!footer_reached("one\ntwo\nGood bye from Longbow!\n"));
    }

    #[test]
    fn marker_further_up_does_not_count() {
        assert!(!footer_reached("Good bye from Longbow!\nmore\nstill more\n"));
    }

    #[test]
    fn trailing_line_without_newline() {
        assert!(footer_reached("Good bye from Longbow!\nend"));
    }

    #[test]
    fn crlf_line_endings() {
        assert!(footer_reached("start\r\nGood bye from Longbow!\r\nend\r\n"));
    }

    #[tokio::test]
    async fn missing_file_is_not_terminated() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!detect_termination(&dir.path().join("log")).await);
    }

    #[tokio::test]
    async fn directory_is_not_terminated() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!detect_termination(dir.path()).await);
    }

    #[tokio::test]
    async fn reads_footer_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log");
        std::fs::write(&path, "job done\nGood bye from Longbow!\n\n").unwrap();
        // "\n\n" ends with an empty line, so the marker is second-to-last
        assert!(detect_termination(&path).await);
    }
}
