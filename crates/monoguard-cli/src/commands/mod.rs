//! Command implementations for the monoguard CLI.

pub mod cli_deps;
pub mod compute;
pub mod deps;
pub mod packages;

use monoguard_core::Error;

/// Report a core error and exit non-zero.
///
/// JSON mode prints one stable error object to stdout; human mode prints a
/// single `error:` line to stderr.
pub(crate) fn fail(err: &Error, json: bool) -> ! {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": {
                    "code": err.code(),
                    "message": err.to_string()
                }
            })
        );
    } else {
        eprintln!("error: {err}");
    }
    std::process::exit(1);
}
