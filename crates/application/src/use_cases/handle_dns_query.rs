use crate::ports::{Clock, DnsZone, FallbackResolver, GarpNotifier, HypervisorDriver};
use crate::services::VmRegistry;
use hypnos_dns_domain::{DnsQuestion, DomainError, QueryAnswer, VmPowerState, VmRecord};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the server loop should do with a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryDisposition {
    /// Malformed question section; send nothing.
    Ignore,
    /// Answer with the given records and response code.
    Respond(QueryAnswer),
    /// Neither the zone nor the fallback produced an answer.
    ServFail,
}

/// The activation engine: ties an incoming DNS question to the registry,
/// drives the hypervisor so the VM behind the name is runnable, and only
/// then releases the zone's answer.
pub struct HandleDnsQueryUseCase {
    registry: Arc<VmRegistry>,
    zone: Arc<dyn DnsZone>,
    driver: Arc<dyn HypervisorDriver>,
    clock: Arc<dyn Clock>,
    notifier: Option<Arc<dyn GarpNotifier>>,
    fallback: Option<Arc<dyn FallbackResolver>>,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        registry: Arc<VmRegistry>,
        zone: Arc<dyn DnsZone>,
        driver: Arc<dyn HypervisorDriver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            zone,
            driver,
            clock,
            notifier: None,
            fallback: None,
        }
    }

    pub fn with_garp_notifier(mut self, notifier: Arc<dyn GarpNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_fallback_resolver(mut self, fallback: Arc<dyn FallbackResolver>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Process one packet's question section.
    pub async fn process(
        &self,
        questions: &[DnsQuestion],
        client_ip: IpAddr,
    ) -> QueryDisposition {
        let [question] = questions else {
            debug!(
                count = questions.len(),
                client = %client_ip,
                "Ignoring packet with unsupported question count"
            );
            return QueryDisposition::Ignore;
        };

        info!(
            name = %question.name,
            qtype = %question.record_type,
            client = %client_ip,
            "DNS query received"
        );

        let answer = self.zone.answer(&question.name, question.record_type);
        if !answer.is_noerror() {
            debug!(name = %question.name, rcode = answer.rcode.as_str(), "Not in local zone");
            return self.delegate(question).await;
        }

        match self.registry.by_domain(&question.name) {
            Some(vm) => {
                self.activate(&vm).await;
                QueryDisposition::Respond(answer)
            }
            None => {
                info!(name = %question.name, "No VM bound to local name");
                self.delegate(question).await
            }
        }
    }

    async fn delegate(&self, question: &DnsQuestion) -> QueryDisposition {
        let Some(fallback) = &self.fallback else {
            return QueryDisposition::ServFail;
        };
        match fallback.resolve(question).await {
            Some(answer) => QueryDisposition::Respond(answer),
            None => QueryDisposition::ServFail,
        }
    }

    /// Bring the VM up if a query warrants it. Best-effort from DNS's
    /// standpoint: every backend fault is logged and swallowed so the
    /// answer still goes out.
    async fn activate(&self, vm: &Arc<VmRecord>) {
        vm.note_requested(self.clock.now_unix());

        if let Err(e) = self.try_activate(vm).await {
            warn!(vm = %vm.name, error = %e, "Activation failed; serving answer anyway");
        }
    }

    async fn try_activate(&self, vm: &Arc<VmRecord>) -> Result<(), DomainError> {
        let state = self.driver.power_state(&vm.handle).await?;

        match state {
            VmPowerState::Running => {
                debug!(vm = %vm.name, "VM already running");
                return Ok(());
            }
            VmPowerState::Paused => {
                info!(vm = %vm.name, "Resuming paused VM");
                self.driver.resume(&vm.handle).await?;
            }
            s if s.is_cold() => {
                info!(vm = %vm.name, state = %s, "Starting VM");
                self.driver.start(&vm.handle).await?;
            }
            other => {
                warn!(vm = %vm.name, state = %other, "VM cannot be started from this state");
                return Ok(());
            }
        }

        self.send_garp(vm).await;
        vm.note_started(self.clock.now_unix());

        if !vm.response_delay.is_zero() {
            debug!(
                vm = %vm.name,
                delay_ms = vm.response_delay.as_millis() as u64,
                "Holding answer for boot delay"
            );
            tokio::time::sleep(vm.response_delay).await;
        }

        Ok(())
    }

    async fn send_garp(&self, vm: &Arc<VmRecord>) {
        let (Some(notifier), Some(mac)) = (&self.notifier, vm.mac) else {
            return;
        };
        if let Err(e) = notifier.send_garp(mac, vm.ip).await {
            warn!(vm = %vm.name, error = %e, "gARP notification failed");
        }
    }
}
