//! Test server management.
//!
//! Runs a relayd gateway inside the test's runtime, configured through a
//! real TOML file and bound to an ephemeral port.

use relayd::config::{self, Config};
use relayd::network::Gateway;
use relayd::state::Matrix;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A test server instance. The accept loop stops when this is dropped.
pub struct TestServer {
    addr: SocketAddr,
    matrix: Arc<Matrix>,
    task: JoinHandle<()>,
    _config_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Spawn a server without a connection password.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with("").await
    }

    /// Spawn a server requiring `password`.
    pub async fn spawn_with_password(password: &str) -> anyhow::Result<Self> {
        Self::spawn_with(&format!("password = \"{}\"\n", password)).await
    }

    /// Spawn a server with extra lines appended to the `[server]` table,
    /// followed by optional further tables.
    pub async fn spawn_with(server_extra: &str) -> anyhow::Result<Self> {
        let config_dir = tempfile::tempdir()?;
        let config_path = config_dir.path().join("config.toml");
        let content = format!(
            r#"
[server]
name = "test.server"
{}
[listen]
address = "127.0.0.1:0"

[logging]
level = "warn"

[limits]
max_line_len = 512
sendq = 256
"#,
            server_extra
        );
        std::fs::write(&config_path, content)?;

        let config = Config::load(&config_path)?;
        if let Err(errors) = config::validate(&config) {
            anyhow::bail!("invalid test config: {:?}", errors);
        }

        let matrix = Arc::new(Matrix::new(&config));
        let gateway =
            Gateway::bind(config.listen.address, Arc::clone(&matrix), config.limits.clone())
                .await?;
        let addr = gateway.local_addr()?;

        let task = tokio::spawn(async move {
            if let Err(e) = gateway.run().await {
                eprintln!("test gateway stopped: {}", e);
            }
        });

        Ok(Self {
            addr,
            matrix,
            task,
            _config_dir: config_dir,
        })
    }

    /// Get the server address as `host:port`.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Shared server state, for asserting on registries directly.
    pub fn matrix(&self) -> &Arc<Matrix> {
        &self.matrix
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
