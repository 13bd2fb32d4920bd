use anyhow::Context;
use hypnos_dns_application::ports::{FallbackResolver, GarpNotifier};
use hypnos_dns_application::{
    AddVmRequest, AddVmUseCase, HandleDnsQueryUseCase, ReapExpiredVmsUseCase, VmRegistry,
};
use hypnos_dns_domain::Config;
use hypnos_dns_infrastructure::dns::{TrieZone, UdpFallbackResolver};
use hypnos_dns_infrastructure::garp::GarpClient;
use hypnos_dns_infrastructure::hypervisor::build_driver;
use hypnos_dns_infrastructure::system::SystemClock;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct Services {
    pub registry: Arc<VmRegistry>,
    pub engine: Arc<HandleDnsQueryUseCase>,
    pub reap: Arc<ReapExpiredVmsUseCase>,
}

impl Services {
    /// Wire the whole object graph: hypervisor connection, zone, registry,
    /// one AddVm per configured entry, then the engine and reaper on top.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        info!(backend = %config.hypervisor.backend, "Connecting to hypervisor");
        let driver = build_driver(&config.hypervisor)
            .await
            .context("hypervisor connection failed")?;

        let registry = Arc::new(VmRegistry::with_capacity(config.registry.vm_count));
        let zone = Arc::new(TrieZone::new());
        let clock = Arc::new(SystemClock);

        let add_vm = AddVmUseCase::new(
            Arc::clone(&registry),
            zone.clone(),
            Arc::clone(&driver),
            clock.clone(),
        );

        for entry in &config.vms {
            add_vm
                .execute(AddVmRequest {
                    domain: entry.domain.clone(),
                    name: entry.name.clone(),
                    ip: entry.ip,
                    stop_mode: entry.stop_mode,
                    response_delay: Duration::from_secs_f64(entry.response_delay_secs),
                    dns_ttl: entry.dns_ttl,
                })
                .await
                .with_context(|| format!("failed to register VM '{}'", entry.name))?;
        }
        info!(vms = registry.len(), "VM registration complete");

        let mut engine = HandleDnsQueryUseCase::new(
            Arc::clone(&registry),
            zone,
            Arc::clone(&driver),
            clock.clone(),
        );

        if let Some(notifier) = build_garp_notifier(config, &registry) {
            engine = engine.with_garp_notifier(notifier);
        }
        if let Some(fallback) = build_fallback(config)? {
            engine = engine.with_fallback_resolver(fallback);
        }

        let reap = Arc::new(ReapExpiredVmsUseCase::new(
            Arc::clone(&registry),
            driver,
            clock,
        ));

        Ok(Self {
            registry,
            engine: Arc::new(engine),
            reap,
        })
    }
}

/// The notifier lives in a managed VM itself, so its address comes from
/// the registry after registration. The connection is primed in the
/// background; activation never waits on it.
fn build_garp_notifier(config: &Config, registry: &Arc<VmRegistry>) -> Option<Arc<dyn GarpNotifier>> {
    let domain = config.garp.notifier_domain.as_deref()?;

    let Some(vm) = registry.by_domain(domain) else {
        warn!(domain, "gARP notifier domain is not a registered VM; gARP disabled");
        return None;
    };

    let addr = SocketAddr::new(IpAddr::V4(vm.ip), config.garp.port);
    let client = Arc::new(GarpClient::new(addr));

    let primed = Arc::clone(&client);
    tokio::spawn(async move { primed.connect().await });

    info!(domain, notifier = %addr, "gARP notifier configured");
    Some(client)
}

fn build_fallback(config: &Config) -> anyhow::Result<Option<Arc<dyn FallbackResolver>>> {
    let Some(server) = config.upstream.forward_resolver.as_deref() else {
        return Ok(None);
    };

    let resolver = UdpFallbackResolver::new(server, config.upstream.query_timeout)
        .context("invalid forward resolver")?;
    info!(upstream = server, "Fallback resolver configured");
    Ok(Some(Arc::new(resolver)))
}
