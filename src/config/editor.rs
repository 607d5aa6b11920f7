use std::path::{Path, PathBuf};
use std::process::Command;
use std::{env, fs, io};
use uuid::Uuid;

use super::paths::expand;

/// Where the document to merge comes from.
pub trait ConfigSource {
    fn describe(&self) -> String;
    fn read(&mut self) -> io::Result<Vec<u8>>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: &str) -> Self {
        Self { path: expand(path) }
    }
}

impl ConfigSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&mut self) -> io::Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("could not open file '{}': {}", self.path.display(), e),
            )
        })
    }
}

/// Opens a blank temporary document in an editor and returns what was
/// saved into it.
pub struct EditorSource {
    editor: String,
    temp_dir: PathBuf,
}

impl EditorSource {
    pub fn new(editor: String) -> Self {
        Self {
            editor,
            temp_dir: env::temp_dir(),
        }
    }

    #[cfg(test)]
    pub fn with_temp_dir(editor: String, temp_dir: PathBuf) -> Self {
        Self { editor, temp_dir }
    }

    fn open(&self, path: &Path) -> io::Result<()> {
        let mut parts = self.editor.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "no editor configured")
        })?;

        let status = Command::new(program).args(parts).arg(path).status()?;
        if !status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("editor '{}' exited with {}", self.editor, status),
            ));
        }
        Ok(())
    }
}

impl ConfigSource for EditorSource {
    fn describe(&self) -> String {
        format!("editor '{}'", self.editor)
    }

    fn read(&mut self) -> io::Result<Vec<u8>> {
        let path = self.temp_dir.join(format!("k8ctx-{}.yaml", Uuid::new_v4()));
        fs::write(&path, b"")?;

        let result = self.open(&path).and_then(|_| fs::read(&path));

        if let Err(e) = fs::remove_file(&path) {
            eprintln!("Failed to remove {}: {}", path.display(), e);
        }
        result
    }
}

/// `preferred` (from settings) first, then `$EDITOR`, then a platform default.
pub fn resolve_editor(preferred: Option<&str>, env_editor: Option<String>) -> String {
    preferred
        .map(str::to_string)
        .or(env_editor)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "vi".to_string()
            }
        })
}
