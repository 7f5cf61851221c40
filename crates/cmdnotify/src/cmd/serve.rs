use cmdnotify::supervisor::{serve_stdio, SupervisorConfig};

use crate::cmd::{parse_duration, ServeArgs};
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS};

/// Run the helper loop over this process's stdin/stdout.
///
/// This is the same loop the re-exec hook runs; exposing it as a
/// subcommand lets non-Rust hosts and scripts drive the protocol.
pub fn run(args: ServeArgs) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let kill_grace = parse_duration(&args.kill_grace)?;

    let config = SupervisorConfig::new(&args.command, timeout)
        .with_args(args.args.clone())
        .with_kill_grace(kill_grace);

    match serve_stdio(&config) {
        Ok(()) => Ok(SUCCESS),
        Err(err) => Err(CliError::new(INTERNAL, format!("helper loop failed: {err}"))),
    }
}
