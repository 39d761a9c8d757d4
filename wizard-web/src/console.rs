//! `tracing` output routed to the browser console

use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl From<Level> for ConsoleMethod {
    fn from(level: Level) -> Self {
        if level == Level::ERROR {
            ConsoleMethod::Error
        } else if level == Level::WARN {
            ConsoleMethod::Warn
        } else if level == Level::INFO {
            ConsoleMethod::Info
        } else {
            ConsoleMethod::Debug
        }
    }
}

/// Buffers one formatted event and hands it to the console when dropped.
pub struct ConsoleWriter {
    method: ConsoleMethod,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn line(&self) -> String {
        String::from_utf8_lossy(&self.buffer).trim_end().to_string()
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = JsValue::from_str(&self.line());
        match self.method {
            ConsoleMethod::Error => console::error_1(&line),
            ConsoleMethod::Warn => console::warn_1(&line),
            ConsoleMethod::Info => console::info_1(&line),
            ConsoleMethod::Debug => console::debug_1(&line),
        }
    }
}

pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> ConsoleWriter {
        ConsoleWriter {
            method: ConsoleMethod::Info,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> ConsoleWriter {
        ConsoleWriter {
            method: ConsoleMethod::from(*meta.level()),
            buffer: Vec::new(),
        }
    }
}

/// Install the console subscriber. A second call keeps the first one.
pub fn init(max_level: Level) {
    // the clock is unavailable on wasm32-unknown-unknown
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .with_max_level(max_level)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Console subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_pick_console_methods() {
        assert_eq!(ConsoleMethod::from(Level::ERROR), ConsoleMethod::Error);
        assert_eq!(ConsoleMethod::from(Level::WARN), ConsoleMethod::Warn);
        assert_eq!(ConsoleMethod::from(Level::INFO), ConsoleMethod::Info);
        assert_eq!(ConsoleMethod::from(Level::DEBUG), ConsoleMethod::Debug);
        assert_eq!(ConsoleMethod::from(Level::TRACE), ConsoleMethod::Debug);
    }

    #[test]
    fn writer_collects_one_event() {
        let mut writer = ConsoleMakeWriter.make_writer();
        write!(writer, " WARN wizard_web: Session busy").unwrap();
        writeln!(writer, ", highlight left in place").unwrap();
        assert_eq!(
            writer.line(),
            " WARN wizard_web: Session busy, highlight left in place"
        );
        // nothing reaches the console off wasm
        writer.buffer.clear();
    }
}
