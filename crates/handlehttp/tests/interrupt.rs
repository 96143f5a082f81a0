//! SIGINT stops `run` with no cancellation from the caller.
//!
//! Kept in its own test binary: the signal is delivered to the whole process.

#![cfg(unix)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{greet, Calls};
use handlehttp::prelude::*;
use handlehttp::server::{LogLevel, RecordingLogger};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::signal::unix::{signal, SignalKind};

#[tokio::test]
async fn test_interrupt_stops_run() {
    // Installed before anything is sent so SIGINT never takes the default
    // action on the test process.
    let _sigint = signal(SignalKind::interrupt()).expect("install SIGINT handler");

    let recorder = Arc::new(RecordingLogger::new());
    let logger: SharedLogger = recorder.clone();
    let endpoint = handle_with(logger.clone(), greet, Calls::default());

    let handle = tokio::spawn(async move {
        run(ShutdownSignal::new(), logger, endpoint, "127.0.0.1", "0").await;
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while !recorder.contains(LogLevel::Info, "Listening on") {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("server should start listening");
    tokio::time::sleep(Duration::from_millis(200)).await;

    kill(Pid::this(), Signal::SIGINT).expect("send SIGINT");

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("run should return after SIGINT")
        .unwrap();

    assert!(recorder.contains(LogLevel::Info, "Received SIGINT"));
    assert!(!recorder.contains(LogLevel::Info, "Shutdown requested"));
    assert!(recorder.contains(LogLevel::Info, "Server stopped"));
}
