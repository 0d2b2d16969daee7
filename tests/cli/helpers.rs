use std::io::Write;
use std::process::{Command, Output};

use readlog::application::routes::app_router;
use readlog::application::services::StatsInvalidator;
use readlog::application::state::{AppState, AppStateConfig};
use serde_json::Value;
use tempfile::NamedTempFile;
use tokio::runtime::Runtime;

/// Run the `readlog` binary with the given arguments and extra environment.
pub fn run_readlog(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_readlog"));
    command
        .args(args)
        .env_remove("READLOG_URL")
        .env("RUST_LOG", "warn");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("failed to run readlog binary")
}

/// Parse stdout as JSON, failing with the captured stderr on error.
pub fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|_| panic!("Should output valid JSON, got: {stdout}"))
}

/// Write `contents` to a temporary `.json` file that lives as long as the
/// returned handle.
pub fn books_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp file");
    file
}

/// An in-process server running on its own runtime for the lifetime of the
/// handle.
pub struct TestServer {
    pub address: String,
    _runtime: Runtime,
}

pub fn spawn_server() -> TestServer {
    let runtime = Runtime::new().expect("failed to build runtime");

    let address = runtime.block_on(async {
        let (tx, _rx) = tokio::sync::mpsc::channel(1);
        let state = AppState::in_memory(AppStateConfig {
            stats_invalidator: StatsInvalidator::new(tx),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let address = format!("http://{}", listener.local_addr().expect("local address"));

        tokio::spawn(async move {
            axum::serve(listener, app_router(state))
                .await
                .expect("Server failed to start");
        });
        address
    });

    TestServer {
        address,
        _runtime: runtime,
    }
}

pub const SAMPLE_BOOKS: &str = r#"[
    {
        "id": 1,
        "title": "A Wizard of Earthsea",
        "author": "Ursula K. Le Guin",
        "numberOfPages": 300,
        "status": "completed",
        "completionDate": "2023-03-12",
        "startReadingDate": "2023-03-01",
        "subjects": ["Fantasy"]
    },
    {
        "id": "2",
        "title": "The Dispossessed",
        "author": ["Ursula K. Le Guin"],
        "numberOfPages": "387",
        "status": "completed",
        "completionDate": "2024-01-20T18:30:00Z",
        "subjects": ["Science Fiction", "Fantasy"]
    },
    {
        "id": 3,
        "title": "Piranesi",
        "status": "to-read",
        "purchased": true
    }
]"#;
