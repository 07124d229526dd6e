//! The two generated files and how they leave the process.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{CompileError, Result};
use crate::template::with_suffix;

/// Rendered header and source, each trimmed and ending in one newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub header: String,
    pub source: String,
}

impl Artifacts {
    pub fn new(header: &str, source: &str) -> Self {
        Self {
            header: format!("{}\n", header.trim()),
            source: format!("{}\n", source.trim()),
        }
    }

    /// Both artifacts as printed when no output name is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use docopt_codegen::Artifacts;
    ///
    /// let artifacts = Artifacts::new("h\n\n", "  c");
    /// assert_eq!(artifacts.to_stdout_text(), "Module Header\nh\n\nModule C\nc\n\n");
    /// ```
    pub fn to_stdout_text(&self) -> String {
        format!("Module Header\n{}\nModule C\n{}\n", self.header, self.source)
    }

    /// Writes `<base>.h` and `<base>.c`.
    ///
    /// Both files are first written to temporary files next to their
    /// destination and only moved into place once both writes succeeded, so
    /// a failure leaves no half-written artifact behind.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Io`] naming the path that failed.
    pub fn write(&self, base: impl AsRef<Path>) -> Result<(PathBuf, PathBuf)> {
        let base = base.as_ref();
        let header_path = with_suffix(base, ".h");
        let source_path = with_suffix(base, ".c");
        let dir = match base.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let header_tmp = stage(dir, &header_path, &self.header)?;
        let source_tmp = stage(dir, &source_path, &self.source)?;

        header_tmp
            .persist(&header_path)
            .map_err(|e| CompileError::io(&header_path, e.error))?;
        if let Err(e) = source_tmp.persist(&source_path) {
            // Keep the pair consistent: drop the header we just placed.
            let _ = std::fs::remove_file(&header_path);
            return Err(CompileError::io(&source_path, e.error));
        }

        debug!(header = %header_path.display(), source = %source_path.display(), "Wrote artifacts");
        Ok((header_path, source_path))
    }
}

fn stage(dir: &Path, destination: &Path, contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new_in(dir).map_err(|e| CompileError::io(destination, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| CompileError::io(destination, e))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_normalizes_surrounding_whitespace() {
        let artifacts = Artifacts::new("\n\n#ifndef X\n\n", "int x;\n\n\n");
        assert_eq!(artifacts.header, "#ifndef X\n");
        assert_eq!(artifacts.source, "int x;\n");
    }

    #[test]
    fn test_write_creates_both_files() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("console");
        let artifacts = Artifacts::new("header", "source");

        let (h, c) = artifacts.write(&base).unwrap();
        assert_eq!(h, dir.path().join("console.h"));
        assert_eq!(std::fs::read_to_string(h).unwrap(), "header\n");
        assert_eq!(std::fs::read_to_string(c).unwrap(), "source\n");
    }

    #[test]
    fn test_write_into_missing_directory_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("missing").join("console");
        let err = Artifacts::new("h", "c").write(&base).unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_write_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        Artifacts::new("h", "c").write(dir.path().join("out")).unwrap();
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["out.c", "out.h"]);
    }
}
