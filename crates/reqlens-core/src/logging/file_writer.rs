use std::fs::{File, OpenOptions};
use std::io::{self, Stderr, Write};
use std::path::PathBuf;
use tracing_subscriber::fmt::MakeWriter;

/// MakeWriter that appends events to a log file.
///
/// The file is reopened per writer, so a log file deleted mid-session comes
/// back on the next event. When opening fails the sink degrades to stderr;
/// the failure itself is reported on stderr directly since the event
/// pipeline is exactly what just broke.
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn open(&self) -> io::Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

/// Destination handed out for one event
pub enum LogSink {
    File(io::BufWriter<File>),
    Stderr(Stderr),
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(w) => w.write(buf),
            LogSink::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(w) => w.flush(),
            LogSink::Stderr(w) => w.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self.open() {
            Ok(file) => LogSink::File(io::BufWriter::new(file)),
            Err(err) => {
                eprintln!(
                    "failed to open log file {}: {}, writing to stderr",
                    self.path.display(),
                    err
                );
                LogSink::Stderr(io::stderr())
            }
        }
    }
}
