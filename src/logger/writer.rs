//! Size-rotating file writer

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::{FileConfig, RotationConfig};

/// File writer that shifts `app.log` to `app.log.1`, `app.log.1` to
/// `app.log.2` and so on once `max_size` bytes have been written. The file
/// past `max_files` is removed.
///
/// When the file cannot be written or rotated, the writer switches to stderr
/// for the rest of the process so log lines are never silently lost.
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
    path: PathBuf,
    rotation: RotationConfig,
}

struct WriterState {
    file: BufWriter<File>,
    current_size: u64,
    fallback_mode: bool,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = open_log_file(&config.path, config.append)?;
        let current_size = if config.append {
            fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                file,
                current_size,
                fallback_mode: false,
            })),
            path: config.path.clone(),
            rotation: config.rotation,
        })
    }

    pub fn is_in_fallback_mode(&self) -> bool {
        self.state.lock().map(|s| s.fallback_mode).unwrap_or(true)
    }

    /// Path of the n-th rotated file, `1` being the most recent.
    pub fn rotated_path(path: &Path, index: usize) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&self, state: &mut WriterState) -> io::Result<()> {
        state.file.flush()?;

        let oldest = Self::rotated_path(&self.path, self.rotation.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.rotation.max_files).rev() {
            let from = Self::rotated_path(&self.path, index);
            if from.exists() {
                fs::rename(&from, Self::rotated_path(&self.path, index + 1))?;
            }
        }
        fs::rename(&self.path, Self::rotated_path(&self.path, 1))?;

        state.file = open_log_file(&self.path, false)?;
        state.current_size = 0;
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard { writer: self }
    }
}

/// One guard per log event; flushes when dropped.
pub struct RotatingWriterGuard<'a> {
    writer: &'a RotatingFileWriter,
}

impl Write for RotatingWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .writer
            .state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;

        if state.fallback_mode {
            return io::stderr().write(buf);
        }

        if state.current_size > 0
            && state.current_size + buf.len() as u64 > self.writer.rotation.max_size
            && let Err(e) = self.writer.rotate(&mut state)
        {
            return fall_back(&mut state, buf, e);
        }

        match state.file.write(buf) {
            Ok(written) => {
                state.current_size += written as u64;
                Ok(written)
            }
            Err(e) => fall_back(&mut state, buf, e),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .writer
            .state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        if state.fallback_mode {
            return io::stderr().flush();
        }
        state.file.flush()
    }
}

impl Drop for RotatingWriterGuard<'_> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

fn fall_back(state: &mut WriterState, buf: &[u8], error: io::Error) -> io::Result<usize> {
    eprintln!("log file unavailable, writing to stderr: {}", error);
    state.fallback_mode = true;
    io::stderr().write(buf)
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    Ok(BufWriter::new(file))
}
