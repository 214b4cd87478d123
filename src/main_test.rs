use super::*;

#[test]
fn test_server_exit_error_flags_unexpected_clean_exit() {
    // The server returning Ok before any signal means the accept loop died
    // without an error; the process must still terminate loudly.
    let err = server_exit_error(Ok(Ok(())));
    assert!(err.to_string().contains("unexpectedly"));
}

#[test]
fn test_server_exit_error_keeps_server_errors() {
    let bind = ServerError::Bind {
        addr: "0.0.0.0:8080".to_string(),
        source: std::io::Error::other("address in use"),
    };
    let err = server_exit_error(Ok(Err(bind)));
    assert!(err.to_string().contains("failed to bind 0.0.0.0:8080"));
}

#[test]
fn test_shutdown_timeout_error_names_the_grace_period() {
    // This is the message logged right before the process forces its exit.
    let err = ServerError::ShutdownTimeout(SHUTDOWN_GRACE);
    assert!(err.to_string().contains("30s"));
}

#[tokio::test]
async fn test_server_exit_error_wraps_task_panics() {
    let handle: tokio::task::JoinHandle<Result<(), ServerError>> =
        tokio::spawn(async { panic!("simulated server panic") });
    let join_err = handle.await.expect_err("task should have panicked");

    let err = server_exit_error(Err(join_err));
    assert!(err.to_string().contains("server task failed"));
}
