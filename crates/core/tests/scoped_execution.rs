// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! End-to-end behavior of composed scopes against the process-wide slots.

mod common;

use common::{init_tracing, RecordingAuthority};
use proptest::prelude::*;
use proptest::test_runner::TestRunner;
use serial_test::serial;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use stdguard::{
    authority, check, destination, run_scoped, set_authority, set_destination, Authority,
    CaptureError, CaptureSpec, CapturedBuffer, Denied, Destination, Error, ExitInterception,
    ExpectedExit, LogMode, Operation, StandardStream, StreamCapture, TerminationIntercepted,
    EXIT_NOT_CALLED, MISSING_LOG_MODE,
};

/// Code under test: reports progress, then gives up.
fn shutdown(status: i32) {
    stdguard::outln!("shutting down");
    stdguard::errln!("fatal: status {}", status);
    stdguard::exit(status);
}

fn same_authority(a: &Option<Arc<dyn Authority>>, b: &Option<Arc<dyn Authority>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[test]
#[serial]
fn hello_world_scenario() {
    init_tracing();
    let original = CapturedBuffer::new();
    let previous = set_destination(StandardStream::Stdout, Destination::new(original.clone()));

    let capture = StreamCapture::builder()
        .mode(LogMode::LogAndWrite)
        .build()
        .unwrap();
    run_scoped(&capture, || {
        write!(stdguard::stdout(), "hello").unwrap();
        assert_eq!(capture.log(), "hello");
    });
    write!(stdguard::stdout(), "world").unwrap();

    set_destination(StandardStream::Stdout, previous);
    assert_eq!(original.text(), "helloworld");
    assert_eq!(capture.log(), "hello");
}

#[test]
#[serial]
fn exit_scenario_keeps_first_status() {
    init_tracing();
    let original: Arc<dyn Authority> = Arc::new(RecordingAuthority::default());
    let before = set_authority(Some(original));
    let interception = ExitInterception::new();

    run_scoped(&interception, || {
        let first = panic::catch_unwind(|| stdguard::exit(1)).unwrap_err();
        assert_eq!(
            TerminationIntercepted::from_panic(&*first).map(|s| s.status()),
            Some(1)
        );
        assert!(interception.is_termination_requested());
        assert_eq!(interception.first_termination_status(), Ok(1));

        let second = panic::catch_unwind(|| stdguard::exit(2)).unwrap_err();
        assert_eq!(
            TerminationIntercepted::from_panic(&*second).map(|s| s.status()),
            Some(2)
        );
        assert_eq!(interception.first_termination_status(), Ok(1));
    });

    let restored = set_authority(before);
    assert!(restored.is_some());
}

#[test]
#[serial]
fn status_query_without_exit_fails_with_fixed_message() {
    let interception = ExitInterception::new();
    run_scoped(&interception, || {});

    let err = interception.first_termination_status().unwrap_err();
    assert_eq!(err, Error::IllegalState(EXIT_NOT_CALLED));
    assert_eq!(err.to_string(), "checkExit(int) has not been called.");
}

#[test]
#[serial]
fn composed_scopes_capture_both_streams_and_exit() {
    init_tracing();
    let stdout = StreamCapture::stdout(LogMode::LogOnly);
    let stderr = StreamCapture::stderr(LogMode::LogOnly);
    let expected = ExpectedExit::none().expect_exit_with_status(3);

    let result = run_scoped(&(&stdout, &stderr), || expected.run(|| shutdown(3)));

    assert_eq!(result, Ok(()));
    assert_eq!(stdout.log(), "shutting down\n");
    assert_eq!(stderr.log(), "fatal: status 3\n");
    assert!(destination(StandardStream::Stdout).is_process());
    assert!(destination(StandardStream::Stderr).is_process());
    assert!(authority().is_none());
}

#[test]
#[serial]
fn guard_delegates_global_checks_to_previous_authority() {
    let recorder = Arc::new(RecordingAuthority::denying(&["exec"]));
    let previous: Arc<dyn Authority> = recorder.clone();
    let before = set_authority(Some(previous));
    let interception = ExitInterception::new();

    let (listen, exec) = run_scoped(&interception, || {
        (
            check(&Operation::Listen(234)),
            check(&Operation::Exec("rm -rf /".into())),
        )
    });

    set_authority(before);
    assert_eq!(listen, Ok(()));
    assert_eq!(
        exec,
        Err(Error::Denied(Denied::new(
            "exec 'rm -rf /'",
            "denied by fixture"
        )))
    );
    assert_eq!(
        recorder.seen(),
        vec![Operation::Listen(234), Operation::Exec("rm -rf /".into())]
    );
}

#[test]
#[serial]
fn nested_guards_restore_in_stack_order() {
    let outer = ExitInterception::new();
    let inner = ExitInterception::new();

    run_scoped(&outer, || {
        let outer_authority = authority();
        run_scoped(&inner, || {
            let _ = panic::catch_unwind(|| stdguard::exit(4));
        });
        assert!(same_authority(&authority(), &outer_authority));
    });

    assert!(authority().is_none());
    assert!(inner.is_termination_requested());
    assert!(!outer.is_termination_requested());
}

#[test]
#[serial]
fn reentered_rules_stay_installed_for_the_outer_body() {
    let original = CapturedBuffer::new();
    let previous = set_destination(StandardStream::Stdout, Destination::new(original.clone()));
    let interception = ExitInterception::new();
    let capture = StreamCapture::stdout(LogMode::LogOnly);

    let still_guarded = run_scoped(&(&interception, &capture), || {
        run_scoped(&(&interception, &capture), || stdguard::out!("inner"));
        stdguard::out!(" outer-after-inner");
        authority().is_some()
    });

    set_destination(StandardStream::Stdout, previous);
    assert!(still_guarded);
    assert_eq!(capture.log(), "inner outer-after-inner");
    assert!(original.is_empty());
    assert!(authority().is_none());
}

#[test]
fn capture_configuration_errors_convert_into_core_error() {
    let missing: Error = StreamCapture::builder().build().unwrap_err().into();
    assert_eq!(
        missing,
        Error::Capture(CaptureError::InvalidConfiguration(
            MISSING_LOG_MODE.to_string()
        ))
    );

    let parse: Error = CaptureSpec::from_json("{").unwrap_err().into();
    assert!(matches!(parse, Error::Capture(CaptureError::Parse(_))), "{:?}", parse);
}

#[test]
#[serial]
fn restoration_invariant_holds_for_returning_and_panicking_bodies() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    let strategy = (any::<bool>(), any::<bool>(), "[a-z]{0,6}");

    runner
        .run(&strategy, |(panics, log_only, text)| {
            let out_before = destination(StandardStream::Stdout);
            let authority_before = authority();
            let mode = if log_only {
                LogMode::LogOnly
            } else {
                LogMode::LogAndWrite
            };
            let original = CapturedBuffer::new();
            let redirected =
                set_destination(StandardStream::Stdout, Destination::new(original.clone()));

            let capture = StreamCapture::stdout(mode);
            let interception = ExitInterception::new();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                run_scoped(&(&interception, &capture), || {
                    stdguard::out!("{}", text);
                    if panics {
                        stdguard::exit(1);
                    }
                })
            }));

            set_destination(StandardStream::Stdout, redirected);
            prop_assert_eq!(outcome.is_err(), panics);
            prop_assert_eq!(destination(StandardStream::Stdout), out_before);
            prop_assert!(same_authority(&authority(), &authority_before));
            prop_assert_eq!(capture.log(), text.clone());
            if log_only {
                prop_assert!(original.is_empty());
            } else {
                prop_assert_eq!(original.text(), text);
            }
            Ok(())
        })
        .unwrap();
}
