use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use nntp_mock::{
    Backend, Credentials, DiskBackend, DiskConfig, Durability, NntpServer, ServerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "nntp-mock", about = "Minimal disk-backed NNTP server for tests")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:1199")]
    bind: SocketAddr,

    /// Database file
    #[arg(long, default_value = nntp_mock::DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// Delete the database on shutdown
    #[arg(long, default_value_t = false)]
    clean_on_close: bool,

    /// Do not sync commits to disk
    #[arg(long, default_value_t = false)]
    fast: bool,

    /// Require AUTHINFO with this user before posting
    #[arg(long, requires = "password")]
    user: Option<String>,

    /// Password for --user
    #[arg(long, requires = "user")]
    password: Option<String>,

    /// Refuse POST and IHAVE
    #[arg(long, default_value_t = false)]
    read_only: bool,

    /// Assign Message-IDs to articles posted without one
    #[arg(long, default_value_t = false)]
    generate_message_ids: bool,

    /// Additional group to create at startup (repeatable)
    #[arg(long = "group")]
    groups: Vec<String>,
}

impl Args {
    fn disk_config(&self) -> DiskConfig {
        let durability = if self.fast {
            Durability::Fast
        } else {
            Durability::Full
        };
        let mut config = DiskConfig::new(&self.db_path)
            .with_durability(durability)
            .with_clean_on_close(self.clean_on_close)
            .with_posting(!self.read_only)
            .with_generated_message_ids(self.generate_message_ids);
        if let (Some(user), Some(password)) = (&self.user, &self.password) {
            config = config.with_credentials(Credentials::new(user, password));
        }
        for group in &self.groups {
            config = config.with_group(group);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    let backend = Arc::new(DiskBackend::open(args.disk_config())?);

    let server = NntpServer::new(backend.clone(), ServerConfig::new(args.bind));
    let listener = server.bind()?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl-C");
    };
    server.serve_with_shutdown(listener, shutdown).await?;

    backend.close().await?;
    Ok(())
}
