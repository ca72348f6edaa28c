//! Integration tests for the client shell against a live server.
//!
//! The shell talks to the real router over HTTP, so the configuration and
//! session endpoints are exercised exactly as a client would use them.

#![allow(clippy::unwrap_used)]

use tempfile::TempDir;

use tienda_integration_tests::{InMemoryAuditLogs, TestServer, admin, customer, ecommerce};
use tienda_shell::bootstrap::{AuthRestoreBootstrap, AuthSession, ConfigBootstrap};
use tienda_shell::{
    EcommerceConfigStore, ExecutionContext, HookOutcome, PersistedSession, Shell, ShellConfig,
};

const CONFIG_HOOK: &str = ConfigBootstrap::<EcommerceConfigStore>::NAME;
const AUTH_HOOK: &str = AuthRestoreBootstrap::<PersistedSession>::NAME;

fn shell(server_url: &str, dir: &TempDir, context: ExecutionContext) -> Shell {
    let config = ShellConfig::new(server_url, dir.path().join("session"), context).unwrap();
    Shell::connect(config).unwrap()
}

#[tokio::test]
async fn test_fresh_client_loads_config_without_session() {
    let server = TestServer::start(InMemoryAuditLogs::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(&server.url, &dir, ExecutionContext::Client);

    let report = shell.bootstrap().await;

    assert_eq!(report.outcome(CONFIG_HOOK), Some(&HookOutcome::completed()));
    assert_eq!(report.outcome(AUTH_HOOK), Some(&HookOutcome::completed()));
    assert_eq!(shell.ecommerce().config(), Some(&ecommerce()));
    assert!(!shell.session().is_logged_in());
}

#[tokio::test]
async fn test_stored_token_restores_session() {
    let server = TestServer::start(InMemoryAuditLogs::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(&server.url, &dir, ExecutionContext::Client);
    let user = customer();
    shell
        .session()
        .persist(&server.token_for(&user))
        .await
        .unwrap();

    let report = shell.bootstrap().await;

    assert_eq!(
        report.outcome(AUTH_HOOK),
        Some(&HookOutcome::Completed {
            detail: Some("pablo@correo.es".to_string())
        })
    );
    assert_eq!(shell.session().user(), Some(user));
    assert!(shell.session().subscribe().borrow().is_some());
}

#[tokio::test]
async fn test_expired_token_is_dropped() {
    let server = TestServer::start(InMemoryAuditLogs::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(&server.url, &dir, ExecutionContext::Client);
    shell
        .session()
        .persist(&server.expired_token_for(&admin()))
        .await
        .unwrap();

    let report = shell.bootstrap().await;

    assert_eq!(report.outcome(AUTH_HOOK), Some(&HookOutcome::completed()));
    assert!(!shell.session().is_logged_in());
    assert_eq!(shell.session().file().read_token().await.unwrap(), None);
}

#[tokio::test]
async fn test_server_down_degrades_config_only() {
    // Reserve a port, then close it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let shell = shell(&url, &dir, ExecutionContext::Client);
    shell.session().persist("some-token").await.unwrap();

    let report = shell.bootstrap().await;

    assert!(report.outcome(CONFIG_HOOK).unwrap().is_degraded());
    assert_eq!(report.outcome(AUTH_HOOK), Some(&HookOutcome::completed()));
    assert!(shell.ecommerce().config().is_none());
}

#[tokio::test]
async fn test_server_render_runs_no_hooks() {
    let server = TestServer::start(InMemoryAuditLogs::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let shell = shell(&server.url, &dir, ExecutionContext::Server);
    shell
        .session()
        .persist(&server.token_for(&customer()))
        .await
        .unwrap();

    let report = shell.bootstrap().await;

    assert_eq!(report.outcome(CONFIG_HOOK), Some(&HookOutcome::Skipped));
    assert_eq!(report.outcome(AUTH_HOOK), Some(&HookOutcome::Skipped));
    assert!(shell.ecommerce().config().is_none());
    assert!(!shell.session().is_logged_in());
}
