use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::trace::trace::GestureTraceEvent;

struct TraceSink {
    path: PathBuf,
    file: Mutex<File>,
}

/// Appends one JSON line per finished gesture. Problems with the file
/// disable tracing instead of failing the session.
#[derive(Default)]
pub struct TraceLogger {
    sink: Option<TraceSink>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some(TraceSink {
                    path: path.to_path_buf(),
                    file: Mutex::new(file),
                }),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "gesture trace disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|s| s.path.as_path())
    }

    pub fn log(&self, event: &GestureTraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let mut line = match serde_json::to_vec(event) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(step = event.step, error = %e, "unserializable gesture event");
                return;
            }
        };
        line.push(b'\n');

        // One write per line keeps concurrent sessions from interleaving.
        let mut file = sink.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = file.write_all(&line) {
            warn!(path = %sink.path.display(), error = %e, "gesture event not written");
        }
    }
}

impl std::fmt::Debug for TraceLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLogger")
            .field("path", &self.path())
            .finish()
    }
}
