//! Console Logger
//!
//! A `tracing` subscriber for CSR front ends: each event is formatted once
//! and handed to the browser console method matching its level, stamped with
//! local wall-clock time.

use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

pub use tracing_subscriber::filter::LevelFilter;

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logger(app_name: &str, level: LevelFilter) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_timer(LocalClock)
        .with_ansi(false)
        .with_target(true)
        .with_max_level(level)
        .try_init()
        .map_err(|e| format!("failed to install logger: {}", e))?;
    tracing::info!(app = app_name, %level, "logger ready");
    Ok(())
}

/// `HH:MM:SS.mmm` in local time
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Browser console methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Log,
    Debug,
}

impl ConsoleMethod {
    pub fn for_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => ConsoleMethod::Error,
            Level::WARN => ConsoleMethod::Warn,
            Level::INFO => ConsoleMethod::Info,
            Level::DEBUG => ConsoleMethod::Log,
            Level::TRACE => ConsoleMethod::Debug,
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn emit(self, line: &str) {
        let value = wasm_bindgen::JsValue::from_str(line);
        match self {
            ConsoleMethod::Error => web_sys::console::error_1(&value),
            ConsoleMethod::Warn => web_sys::console::warn_1(&value),
            ConsoleMethod::Info => web_sys::console::info_1(&value),
            ConsoleMethod::Log => web_sys::console::log_1(&value),
            ConsoleMethod::Debug => web_sys::console::debug_1(&value),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn emit(self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Hands out one `ConsoleWriter` per event
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::Log)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::for_level(meta.level()))
    }
}

/// Buffers one formatted event and emits it on drop
#[derive(Debug)]
pub struct ConsoleWriter {
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(method: ConsoleMethod) -> Self {
        Self { method, buf: Vec::new() }
    }

    fn line(&self) -> String {
        String::from_utf8_lossy(&self.buf).trim_end().to_string()
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if !self.buf.is_empty() {
            self.method.emit(&self.line());
        }
    }
}
