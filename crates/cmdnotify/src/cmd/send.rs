use cmdnotify::{Notifier, NotifierConfig};
use tracing::debug;

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{notify_code, spawn_error, CliResult, SUCCESS};
use crate::output::{print_outcome, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;

    let mut config = NotifierConfig::new(&args.command, timeout).with_args(args.args.clone());
    if let Some(node) = &args.node {
        config = config.with_node(node.clone());
    }

    let mut notifier = Notifier::spawn(config).map_err(spawn_error)?;
    let outcome = notifier.log(args.severity, args.errcode, format_args!("{}", args.message));

    match notifier.shutdown() {
        Ok(status) => debug!(?status, "helper exited"),
        Err(err) => debug!(error = %err, "could not reap helper"),
    }

    print_outcome(args.severity, args.errcode, &outcome, format);
    match outcome {
        Ok(()) => Ok(SUCCESS),
        Err(err) => Ok(notify_code(&err)),
    }
}
