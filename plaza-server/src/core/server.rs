//! Server Implementation
//!
//! HTTP server startup and lifecycle.

use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result, ServerState};
use crate::services::{bootstrap, http};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests, embedded runs)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // First-boot seeding (platform admin account)
        bootstrap::ensure_platform_admin(&state).await?;

        // Background tasks: dispatch worker + expiry sweep
        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Plaza Booking Server listening on http://{}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        http::start_server(state, addr, shutdown).await?;

        // HTTP is down; stop the workers before exiting
        tasks.shutdown().await;

        Ok(())
    }
}
