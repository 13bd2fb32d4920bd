use hypnos_dns_domain::MacAddr;
use std::str::FromStr;
use tracing::debug;

/// Pull the first `<interface>`'s `<mac address="…">` out of a libvirt
/// domain description. A missing interface, missing attribute, or
/// unparseable address all mean "no MAC", never an error; the VM just
/// won't get gARP priming.
pub fn first_interface_mac(xml: &str) -> Option<MacAddr> {
    let doc = match roxmltree::Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(error = %e, "Unparseable domain XML");
            return None;
        }
    };

    let interface = doc
        .descendants()
        .find(|n| n.has_tag_name("interface"))?;
    let address = interface
        .children()
        .find(|n| n.has_tag_name("mac"))
        .and_then(|mac| mac.attribute("address"))?;

    match MacAddr::from_str(address) {
        Ok(mac) => Some(mac),
        Err(_) => {
            debug!(address, "Domain XML carries an invalid MAC address");
            None
        }
    }
}
