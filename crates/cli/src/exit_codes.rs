//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | Error: formula evaluated to an error, bad input data |
//! | 2    | Usage: bad arguments, unreadable script, bad script  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - the command ran but the result is an error
/// (formula error marker, malformed CSV).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing file, unparseable replay script.
pub const EXIT_USAGE: u8 = 2;
