use clap::Parser;
use hypnos_dns_domain::{CliOverrides, HypervisorBackend};
use hypnos_dns_infrastructure::dns::DnsServerHandler;
use hypnos_dns_jobs::{JobRunner, VmReaperJob};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "hypnos-dns")]
#[command(version = "0.1.0")]
#[command(about = "Authoritative DNS server that wakes dormant VMs on demand")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Hypervisor backend (libvirt or xapi)
    #[arg(long)]
    backend: Option<HypervisorBackend>,

    /// Hypervisor connection string
    #[arg(long)]
    connstr: Option<String>,

    /// Upstream resolver for unmatched queries (host:port)
    #[arg(long)]
    forward_resolver: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        backend: cli.backend,
        connstr: cli.connstr.clone(),
        forward_resolver: cli.forward_resolver.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting hypnos-dns v{}", env!("CARGO_PKG_VERSION"));

    let services = di::Services::new(&config).await?;

    let shutdown = CancellationToken::new();

    let reaper = VmReaperJob::new(services.reap.clone()).with_interval(config.reaper.interval_secs);
    JobRunner::new()
        .with_reaper(reaper)
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let dns_handler = DnsServerHandler::new(services.engine.clone());

    tokio::spawn(async move {
        if let Err(e) = server::start_dns_server(dns_addr, dns_handler).await {
            error!(error = %e, "DNS server error");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    shutdown.cancel();

    info!("Server shutdown complete");
    Ok(())
}
