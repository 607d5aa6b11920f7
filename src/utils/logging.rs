// src/utils/logging.rs
use chrono::Local;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};

pub trait Logger: Send + Sync {
    fn log(&mut self, message: &str);
    fn debug_log(&mut self, message: &str);
}

#[derive(Debug)]
pub struct FileLogger {
    log_file: String,
    debug: bool,
}

impl FileLogger {
    pub fn new(log_file: &str, debug: bool) -> std::io::Result<Self> {
        // Create log directory if it doesn't exist
        if let Some(parent) = Path::new(log_file).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(FileLogger {
            log_file: log_file.to_string(),
            debug,
        })
    }

    fn write_to_file(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        writeln!(file, "{}: {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message)
    }
}

impl Logger for FileLogger {
    fn log(&mut self, message: &str) {
        if let Err(e) = self.write_to_file(message) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            if let Err(e) = self.write_to_file(&format!("[DEBUG] {}", message)) {
                eprintln!("Failed to write debug log: {}", e);
            }
        }
    }
}

#[derive(Debug)]
pub struct StderrLogger {
    debug: bool,
}

impl StderrLogger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Logger for StderrLogger {
    fn log(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            eprintln!("[DEBUG] {}", message);
        }
    }
}

/// Keeps every line in a shared buffer. Clones share the same buffer, so a
/// caller can hand one clone to the merge engine and read the other back.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, line: String) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}

#[cfg(test)]
impl Logger for MemoryLogger {
    fn log(&mut self, message: &str) {
        self.push(message.to_string());
    }

    fn debug_log(&mut self, message: &str) {
        self.push(format!("[DEBUG] {}", message));
    }
}

// MultiLogger allows logging to multiple destinations
pub struct MultiLogger {
    loggers: Vec<Box<dyn Logger>>,
}

impl MultiLogger {
    pub fn new(loggers: Vec<Box<dyn Logger>>) -> Self {
        Self { loggers }
    }
}

impl Logger for MultiLogger {
    fn log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.log(message);
        }
    }

    fn debug_log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.debug_log(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_logger_clones_share_lines() {
        let logger = MemoryLogger::new();
        let mut handle = logger.clone();

        handle.log("appending context 'staging'");
        handle.debug_log("renaming cluster");

        assert_eq!(
            logger.lines(),
            vec![
                "appending context 'staging'".to_string(),
                "[DEBUG] renaming cluster".to_string(),
            ]
        );
    }

    #[test]
    fn file_logger_skips_debug_lines_unless_enabled() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("logs").join("k8ctx.log");
        let path_str = path.to_string_lossy().to_string();

        let mut quiet = FileLogger::new(&path_str, false)?;
        quiet.log("first");
        quiet.debug_log("hidden");

        let mut verbose = FileLogger::new(&path_str, true)?;
        verbose.debug_log("shown");

        let contents = fs::read_to_string(&path)?;
        assert!(contents.contains(": first"));
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("[DEBUG] shown"));
        Ok(())
    }

    #[test]
    fn multi_logger_fans_out() {
        let a = MemoryLogger::new();
        let b = MemoryLogger::new();
        let mut multi = MultiLogger::new(vec![Box::new(a.clone()), Box::new(b.clone())]);

        multi.log("saved");

        assert_eq!(a.lines(), vec!["saved".to_string()]);
        assert_eq!(b.lines(), vec!["saved".to_string()]);
    }
}
