use hypnos_dns_domain::{CliOverrides, Config, HypervisorBackend, VmStopMode};

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.server.dns_port, 53);
    assert_eq!(config.server.bind_address, "0.0.0.0");
    assert_eq!(config.hypervisor.backend, HypervisorBackend::Libvirt);
    assert!(!config.hypervisor.json_rpc);
    assert!(config.upstream.forward_resolver.is_none());
    assert_eq!(config.upstream.query_timeout, 2000);
    assert_eq!(config.reaper.interval_secs, 10);
    assert_eq!(config.registry.vm_count, 7);
    assert_eq!(config.logging.level, "info");
    assert!(config.vms.is_empty());
}

#[test]
fn test_parse_full_toml() {
    let toml_str = r#"
        [server]
        dns_port = 5353
        bind_address = "127.0.0.1"

        [hypervisor]
        backend = "xapi"
        connstr = "https://xen.example.org:secret"
        json_rpc = true

        [upstream]
        forward_resolver = "8.8.8.8:53"

        [garp]
        notifier_domain = "notifier.example.org"

        [reaper]
        interval_secs = 5

        [[vms]]
        domain = "mirage.io"
        name = "www"
        ip = "10.0.0.7"
        stop_mode = "suspend"
        response_delay_secs = 1.5
        dns_ttl = 30
    "#;

    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.dns_port, 5353);
    assert_eq!(config.hypervisor.backend, HypervisorBackend::Xapi);
    assert!(config.hypervisor.json_rpc);
    assert_eq!(
        config.upstream.forward_resolver.as_deref(),
        Some("8.8.8.8:53")
    );
    assert_eq!(
        config.garp.notifier_domain.as_deref(),
        Some("notifier.example.org")
    );
    assert_eq!(config.garp.port, 4001);
    assert_eq!(config.reaper.interval_secs, 5);

    assert_eq!(config.vms.len(), 1);
    let vm = &config.vms[0];
    assert_eq!(vm.domain, "mirage.io");
    assert_eq!(vm.name, "www");
    assert_eq!(vm.ip.to_string(), "10.0.0.7");
    assert_eq!(vm.stop_mode, VmStopMode::Suspend);
    assert!((vm.response_delay_secs - 1.5).abs() < f64::EPSILON);
    assert_eq!(vm.dns_ttl, 30);
}

#[test]
fn test_vm_entry_defaults() {
    let toml_str = r#"
        [[vms]]
        domain = "vm.example.org"
        name = "vm1"
        ip = "192.168.0.2"
    "#;

    let config: Config = toml::from_str(toml_str).unwrap();
    let vm = &config.vms[0];
    assert_eq!(vm.stop_mode, VmStopMode::Shutdown);
    assert_eq!(vm.response_delay_secs, 0.0);
    assert_eq!(vm.dns_ttl, 60);
}

#[test]
fn test_cli_overrides_take_precedence() {
    let overrides = CliOverrides {
        dns_port: Some(10053),
        bind_address: Some("::1".to_string()),
        backend: Some(HypervisorBackend::Xapi),
        connstr: Some("https://xen.local:pw".to_string()),
        forward_resolver: Some("1.1.1.1:53".to_string()),
        log_level: Some("debug".to_string()),
    };

    let config = Config::load(None, overrides).unwrap();
    assert_eq!(config.server.dns_port, 10053);
    assert_eq!(config.server.bind_address, "::1");
    assert_eq!(config.hypervisor.backend, HypervisorBackend::Xapi);
    assert_eq!(config.hypervisor.connstr, "https://xen.local:pw");
    assert_eq!(
        config.upstream.forward_resolver.as_deref(),
        Some("1.1.1.1:53")
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_validate_rejects_port_zero() {
    let mut config = Config::default();
    config.server.dns_port = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_connstr() {
    let mut config = Config::default();
    config.hypervisor.connstr = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unnamed_vm_entry() {
    let toml_str = r#"
        [[vms]]
        domain = ""
        name = "vm1"
        ip = "192.168.0.2"
    "#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_accepts_defaults() {
    assert!(Config::default().validate().is_ok());
}
