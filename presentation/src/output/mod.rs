//! Console output for the one-shot commands

pub mod console;

pub use console::ConsoleFormatter;
