#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use cmdnotify::proto::ExitDisposition;
use cmdnotify::{Notifier, NotifierConfig, NotifyError, Severity};

fn helper_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cmdnotify"))
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/cmdnotify-it-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn shell_notifier(script: &str, timeout: Duration) -> Notifier {
    let config = NotifierConfig::new("/bin/sh", timeout)
        .with_args(["-c", script, "sh"])
        .with_node("test-node")
        .with_helper_program(helper_bin());
    Notifier::spawn(config).expect("helper should spawn")
}

#[test]
fn delivered_message_reaches_command() {
    let dir = unique_temp_dir("deliver");
    let out = dir.join("message.txt");
    let script = format!("printf '%s' \"$1\" > {}", out.display());

    let mut notifier = shell_notifier(&script, Duration::from_secs(5));
    notifier
        .log(Severity::Warning, 3, format_args!("node {} is wedged", 42))
        .expect("notification should be delivered");
    notifier.shutdown().expect("helper should exit cleanly");

    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "node 42 is wedged"
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn help_and_peer_messages_are_annotated() {
    let dir = unique_temp_dir("annotate");
    let out = dir.join("message.txt");
    let script = format!("printf '%s' \"$1\" > {}", out.display());

    let mut notifier = shell_notifier(&script, Duration::from_secs(5));

    notifier
        .help(
            Severity::Notice,
            0,
            "mca-param-deprecated",
            format_args!("use the new name"),
        )
        .expect("help notification should be delivered");
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "[mca-param-deprecated] use the new name"
    );

    notifier
        .peer(
            Severity::Error,
            12,
            "[[1234,0],7]",
            format_args!("lost connection"),
        )
        .expect("peer notification should be delivered");
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "peer [[1234,0],7]: lost connection"
    );

    notifier.shutdown().expect("helper should exit cleanly");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn nonzero_exit_reports_command_failed() {
    let mut notifier = shell_notifier("exit 5", Duration::from_secs(5));

    let err = notifier
        .log(Severity::Error, 0, format_args!("m"))
        .unwrap_err();
    match err {
        NotifyError::CommandFailed {
            node, disposition, ..
        } => {
            assert_eq!(node, "test-node");
            assert_eq!(disposition, ExitDisposition::Exited(5));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn slow_command_times_out_within_bound() {
    let config = NotifierConfig::new("/bin/sleep", Duration::from_millis(300))
        .with_kill_grace(Duration::from_millis(500))
        .with_node("test-node")
        .with_helper_program(helper_bin());
    let mut notifier = Notifier::spawn(config).expect("helper should spawn");

    let started = Instant::now();
    let err = notifier
        .log(Severity::Critical, 0, format_args!("5"))
        .unwrap_err();
    let elapsed = started.elapsed();

    match err {
        NotifyError::Timeout {
            timeout,
            disposition,
            ..
        } => {
            assert_eq!(timeout, Duration::from_millis(300));
            // sleep dies on the SIGTERM the helper sends first.
            assert_eq!(disposition, ExitDisposition::Signaled(15));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(
        elapsed < Duration::from_secs(4),
        "timeout round trip took {elapsed:?}"
    );
}

#[test]
fn missing_command_is_supervisor_fault() {
    let config = NotifierConfig::new(
        "/nonexistent/cmdnotify-integration-binary",
        Duration::from_secs(2),
    )
    .with_node("test-node")
    .with_helper_program(helper_bin());
    let mut notifier = Notifier::spawn(config).expect("helper should spawn");

    let err = notifier
        .log(Severity::Error, 0, format_args!("m"))
        .unwrap_err();
    match err {
        NotifyError::Supervisor {
            node,
            command,
            timeout,
        } => {
            assert_eq!(node, "test-node");
            assert_eq!(command, "/nonexistent/cmdnotify-integration-binary");
            assert_eq!(timeout, Duration::from_secs(2));
        }
        other => panic!("expected Supervisor, got {other:?}"),
    }
}

#[test]
fn notifier_survives_failures_back_to_back() {
    let dir = unique_temp_dir("recover");
    let out = dir.join("message.txt");
    let script = format!(
        "if [ \"$CMDNOTIFY_SEVERITY\" = error ]; then exit 3; fi; printf '%s' \"$1\" > {}",
        out.display()
    );

    let mut notifier = shell_notifier(&script, Duration::from_secs(5));

    let err = notifier
        .log(Severity::Error, 0, format_args!("fails"))
        .unwrap_err();
    assert!(matches!(err, NotifyError::CommandFailed { .. }));

    notifier
        .log(Severity::Info, 0, format_args!("recovers"))
        .expect("helper should keep serving after a failure");
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "recovers");

    notifier.shutdown().expect("helper should exit cleanly");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn shutdown_reaps_helper_with_clean_exit() {
    let notifier = shell_notifier("exit 0", Duration::from_secs(5));
    let status = notifier.shutdown().expect("helper should be reaped");
    assert!(status.success(), "helper exited with {status:?}");
}
