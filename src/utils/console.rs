//! Colored operator-facing output, distinct from `log` diagnostics.

use {
    std::io::Write,
    termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor},
};

fn print_tagged(writer: &BufferWriter, symbol: &str, color: Color, bold: bool, message: &str) {
    let mut buffer = writer.buffer();
    let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold));
    let _ = write!(buffer, "{symbol}");
    let _ = buffer.reset();
    let _ = writeln!(buffer, " {message}");
    let _ = writer.print(&buffer);
}

pub fn info(message: &str) {
    print_tagged(
        &BufferWriter::stdout(ColorChoice::Auto),
        "ℹ",
        Color::Cyan,
        false,
        message,
    );
}

pub fn step(message: &str) {
    print_tagged(
        &BufferWriter::stdout(ColorChoice::Auto),
        "→",
        Color::Blue,
        false,
        message,
    );
}

pub fn success(message: &str) {
    print_tagged(
        &BufferWriter::stdout(ColorChoice::Auto),
        "✓",
        Color::Green,
        true,
        message,
    );
}

pub fn warning(message: &str) {
    print_tagged(
        &BufferWriter::stdout(ColorChoice::Auto),
        "⚠",
        Color::Yellow,
        true,
        message,
    );
}

pub fn error(message: &str) {
    print_tagged(
        &BufferWriter::stderr(ColorChoice::Auto),
        "✗",
        Color::Red,
        true,
        message,
    );
}

pub fn plain(message: &str) {
    println!("{message}");
}
