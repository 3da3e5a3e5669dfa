// src/services/storage.rs
use std::io;
use std::path::PathBuf;

/// File extensions the upload route accepts.
const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx"];

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Check a client-supplied filename against the allow-list: the extension is
/// whatever follows the last dot, compared case-insensitively. Names without
/// a dot are rejected.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Strip a client filename down to a safe storage key: drop any path
/// components, replace everything outside `[A-Za-z0-9._-]` with `_`, and trim
/// leading/trailing dots and underscores so the result cannot traverse out of
/// the upload directory or hide as a dotfile.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let mut out = String::with_capacity(base.len());
    for ch in base.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches(['.', '_']);
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Truncate to at most `max_chars` characters, appending `...` when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut out: String = text.chars().take(max_chars).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

/// Outcome of a successful upload write.
pub struct StoredUpload {
    pub filename: String,
    pub size_mib: f64,
}

impl StoredUpload {
    pub fn description(&self) -> String {
        format!(
            "File saved locally: {} ({:.2} MB)",
            self.filename, self.size_mib
        )
    }
}

/// Flat on-disk store for uploaded files, keyed by sanitized original
/// filename. Same-name uploads overwrite silently; nothing is ever deleted.
#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub async fn save(&self, original_name: &str, data: &[u8]) -> io::Result<StoredUpload> {
        let filename = sanitize_filename(original_name);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&filename), data).await?;

        let size_mib = ((data.len() as f64 / BYTES_PER_MIB) * 100.0).round() / 100.0;
        Ok(StoredUpload { filename, size_mib })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_matches_known_extensions() {
        assert!(allowed_file("report.pdf"));
        assert!(allowed_file("notes.TXT"));
        assert!(allowed_file("photo.jpeg"));
        assert!(!allowed_file("script.sh"));
        assert!(!allowed_file("archive.tar.gz"));
        assert!(!allowed_file("no_extension"));
        assert!(!allowed_file("trailing_dot."));
    }

    #[test]
    fn sanitizer_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename("dir/sub/report.pdf"), "report.pdf");
    }

    #[test]
    fn sanitizer_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my file (1).txt"), "my_file__1_.txt");
        assert_eq!(sanitize_filename(".hidden.txt"), "hidden.txt");
        assert_eq!(sanitize_filename("///"), "file");
    }

    #[test]
    fn truncation_appends_ellipsis_only_when_cut() {
        assert_eq!(truncate_with_ellipsis("short", 500), "short");
        let long = "x".repeat(600);
        let cut = truncate_with_ellipsis(&long, 500);
        assert_eq!(cut.len(), 503);
        assert!(cut.ends_with("..."));
    }

    #[tokio::test]
    async fn save_writes_bytes_and_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().to_path_buf());

        let stored = store.save("hello.txt", b"hello world").await.unwrap();
        assert_eq!(stored.filename, "hello.txt");
        assert!(stored.size_mib < 0.01);

        let on_disk = tokio::fs::read(dir.path().join("hello.txt")).await.unwrap();
        assert_eq!(on_disk, b"hello world");
        assert!(stored.description().contains("hello.txt"));
        assert!(stored.description().contains("MB"));
    }

    #[tokio::test]
    async fn save_rounds_size_to_two_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().to_path_buf());

        // 1_234_567 bytes is 1.17737... MiB and must come back as 1.18.
        let stored = store
            .save("report.pdf", &vec![0u8; 1_234_567])
            .await
            .unwrap();
        assert_eq!(stored.size_mib, 1.18);
        assert!(stored.description().contains("(1.18 MB)"));
    }
}
