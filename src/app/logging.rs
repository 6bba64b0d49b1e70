//! Logger for the terminal front-end.
//!
//! The CLI keeps the terminal in raw mode while reading input, where a bare
//! `\n` does not return the cursor to column 0. Every record is written as a
//! full `\r ... \r\n` line so it never staircases or lands inside the prompt.

use std::fmt;
use std::io::Write;

use log::Level;

pub const DEFAULT_FILTER: &str = "info";

/// Installs `env_logger`, honoring `RUST_LOG` and falling back to `info`.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format(|buf, record| {
            let line = terminal_line(record.level(), record.target(), record.args());
            buf.write_all(line.as_bytes())
        })
        .init();
}

pub fn terminal_line(level: Level, target: &str, message: &fmt::Arguments<'_>) -> String {
    let message = message.to_string().replace("\r\n", "\n").replace('\n', "\r\n");
    format!("\r[{:<5} {}] {}\r\n", level, target, message)
}
