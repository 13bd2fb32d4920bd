use hypnos_dns_infrastructure::hypervisor::domain_xml::first_interface_mac;

const DOMAIN_XML: &str = r#"
<domain type='kvm'>
  <name>www</name>
  <devices>
    <disk type='file' device='disk'>
      <source file='/var/lib/libvirt/images/www.qcow2'/>
    </disk>
    <interface type='bridge'>
      <mac address='52:54:00:8a:3b:1f'/>
      <source bridge='br0'/>
    </interface>
    <interface type='bridge'>
      <mac address='52:54:00:00:00:02'/>
      <source bridge='br1'/>
    </interface>
  </devices>
</domain>
"#;

#[test]
fn test_extracts_first_interface_mac() {
    let mac = first_interface_mac(DOMAIN_XML).unwrap();
    assert_eq!(mac.to_string(), "52:54:00:8a:3b:1f");
}

#[test]
fn test_no_interface_yields_none() {
    let xml = "<domain type='kvm'><name>www</name><devices/></domain>";
    assert!(first_interface_mac(xml).is_none());
}

#[test]
fn test_interface_without_mac_yields_none() {
    let xml = r#"
        <domain>
          <devices>
            <interface type='bridge'><source bridge='br0'/></interface>
          </devices>
        </domain>
    "#;
    assert!(first_interface_mac(xml).is_none());
}

#[test]
fn test_invalid_mac_yields_none() {
    let xml = r#"
        <domain>
          <devices>
            <interface type='bridge'><mac address='not-a-mac'/></interface>
          </devices>
        </domain>
    "#;
    assert!(first_interface_mac(xml).is_none());
}

#[test]
fn test_garbage_xml_yields_none() {
    assert!(first_interface_mac("<<<definitely not xml").is_none());
}
