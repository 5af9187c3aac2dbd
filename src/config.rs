// ABOUTME: Version, banner strings, and process exit codes

pub const VERSION: &str = "0.1.0";
pub const WELCOME_MESSAGE: &str = "Lox Interpreter v0.1.0";
pub const WELCOME_PROMPT: &str = "> ";

/// Matches the `sysexits.h` conventions the original jlox/clox tools used:
/// 65 is `EX_DATAERR`, 70 is `EX_SOFTWARE`.
pub const EXIT_USAGE_ERROR: i32 = 65;
pub const EXIT_RUNTIME_ERROR: i32 = 70;

pub const HISTORY_FILE: &str = ".lox_history";
