//! Human-readable build progress output
//!
//! Progress lines are nested by indentation: a title, then process,
//! subprocess and action lines beneath it.

use console::style;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Writes indented progress lines to an output sink
#[derive(Clone)]
pub struct LogEmitter {
    output: Sink,
}

impl LogEmitter {
    /// Create an emitter writing to the given sink
    pub fn new(output: impl Write + Send + 'static) -> Self {
        Self {
            output: Arc::new(Mutex::new(Box::new(output))),
        }
    }

    /// Create an emitter writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Top-level heading, e.g. the buildpack name and version
    pub fn title(&self, message: impl AsRef<str>) {
        self.line(0, &style(message.as_ref()).bold().to_string());
    }

    /// A step of the build
    pub fn process(&self, message: impl AsRef<str>) {
        self.line(2, message.as_ref());
    }

    /// Detail beneath a process line
    pub fn subprocess(&self, message: impl AsRef<str>) {
        self.line(4, message.as_ref());
    }

    /// Outcome of a subprocess
    pub fn action(&self, message: impl AsRef<str>) {
        self.line(6, message.as_ref());
    }

    /// Blank separator line
    pub fn break_line(&self) {
        self.line(0, "");
    }

    fn line(&self, indent: usize, message: &str) {
        // Progress output is best-effort; a broken pipe must not fail the build.
        if let Ok(mut out) = self.output.lock() {
            writeln!(out, "{:indent$}{}", "", message, indent = indent).ok();
        }
    }
}

impl fmt::Debug for LogEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEmitter").finish_non_exhaustive()
    }
}

/// In-memory sink that can be read back after writing
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut inner) => inner.write(buf),
            Err(_) => Err(io::Error::other("buffer lock poisoned")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
