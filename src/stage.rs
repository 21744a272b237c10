use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::cli::{InputSource, PlaceRequest};
use crate::error::PlaceError;
use crate::paths;

/// Temporary copy of the input data on local disk.
///
/// The file is removed when this value is dropped, whichever way the run ends.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed staged file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to remove staged file: {e}")
            }
        }
    }
}

/// Copy the request's input into a staging file under the host temp dir.
pub fn stage_input(request: &PlaceRequest, stdin: impl Read) -> Result<StagedFile, PlaceError> {
    let path = paths::staging_path(&request.target_file)?;
    stage_at(path, &request.source, stdin)
}

/// Create `path`, fill it from `source` (or `stdin`), and close it.
pub fn stage_at(
    path: PathBuf,
    source: &InputSource,
    mut stdin: impl Read,
) -> Result<StagedFile, PlaceError> {
    let mut file = File::create(&path).map_err(|source| PlaceError::Io {
        context: format!("Failed to create temporary file {}", path.display()),
        source,
    })?;
    let staged = StagedFile { path };

    let bytes = match source {
        InputSource::File(src) => {
            tracing::info!("Reading data from file: {}", src.display());
            let mut reader = File::open(src).map_err(|source| PlaceError::Io {
                context: format!("Failed to open source file {}", src.display()),
                source,
            })?;
            io::copy(&mut reader, &mut file).map_err(|source| PlaceError::Io {
                context: "Failed to copy data from source file".into(),
                source,
            })?
        }
        InputSource::Stdin => {
            tracing::info!("Reading data from standard input...");
            io::copy(&mut stdin, &mut file).map_err(|source| PlaceError::Io {
                context: "Failed to read data from standard input".into(),
                source,
            })?
        }
    };

    // The copy tool opens the file by path, so everything must be on disk first
    file.flush()
        .and_then(|()| file.sync_all())
        .map_err(|source| PlaceError::Io {
            context: "Failed to close temporary file".into(),
            source,
        })?;
    drop(file);

    tracing::debug!(path = %staged.path.display(), bytes, "staged input");
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn stdin_bytes_are_staged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        let staged = stage_at(path.clone(), &InputSource::Stdin, Cursor::new("Hello World")).unwrap();
        assert_eq!(staged.path(), path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello World");
    }

    #[test]
    fn source_file_is_staged_and_stdin_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let data: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
        std::fs::write(&src, &data).unwrap();

        let path = dir.path().join("a.bin");
        let staged = stage_at(
            path.clone(),
            &InputSource::File(src),
            Cursor::new("should not be read"),
        )
        .unwrap();
        assert_eq!(std::fs::read(staged.path()).unwrap(), data);
    }

    #[test]
    fn existing_file_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motd");
        std::fs::write(&path, "a much longer previous content").unwrap();
        let _staged = stage_at(path.clone(), &InputSource::Stdin, Cursor::new("new")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn drop_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        let staged = stage_at(path.clone(), &InputSource::Stdin, Cursor::new("x")).unwrap();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn missing_source_fails_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let err = stage_at(
            path.clone(),
            &InputSource::File(dir.path().join("does-not-exist")),
            io::empty(),
        )
        .unwrap_err();
        assert!(matches!(err, PlaceError::Io { .. }));
        assert!(err.to_string().contains("Failed to open source file"));
        assert!(!path.exists());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin went away"))
        }
    }

    #[test]
    fn stdin_read_error_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let err = stage_at(path.clone(), &InputSource::Stdin, FailingReader).unwrap_err();
        assert!(err.to_string().contains("Failed to read data from standard input"));
        assert!(!path.exists());
    }

    #[test]
    fn uncreatable_staging_path_fails() {
        let err = stage_at(
            PathBuf::from("/nonexistent/dir/a.txt"),
            &InputSource::Stdin,
            io::empty(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to create temporary file"));
    }
}
