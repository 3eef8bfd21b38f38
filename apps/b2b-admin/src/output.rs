//! Operator-facing status output

fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a status line to stdout
pub fn status(message: impl AsRef<str>) {
    println!("{}", message.as_ref());
}

/// Print a success line to stdout
pub fn success(message: impl AsRef<str>) {
    if use_color() {
        println!("\x1b[32m{}\x1b[0m", message.as_ref());
    } else {
        println!("{}", message.as_ref());
    }
}

/// Print a warning to stderr
pub fn warn(message: impl AsRef<str>) {
    if use_color() {
        eprintln!("\x1b[33mWarning:\x1b[0m {}", message.as_ref());
    } else {
        eprintln!("Warning: {}", message.as_ref());
    }
}
