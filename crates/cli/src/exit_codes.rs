//! CLI Exit Code Registry
//!
//! Single source of truth for `qgrid` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 2    | Usage error (bad args, unreadable sheet file)    |
//! | 3    | Table or field not found                         |
//! | 4    | Sheet write rejected, no history recorded        |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing or unreadable file.
/// Same code clap uses for argument errors.
pub const EXIT_USAGE: u8 = 2;

/// The requested table or field does not exist in the sheet.
pub const EXIT_NOT_FOUND: u8 = 3;

/// The sheet updater refused the write.
pub const EXIT_REJECTED: u8 = 4;
