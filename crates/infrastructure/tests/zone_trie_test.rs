use hypnos_dns_application::ports::DnsZone;
use hypnos_dns_infrastructure::dns::TrieZone;
use hypnos_dns_domain::{Rcode, RecordData, RecordType};
use std::net::Ipv4Addr;

fn zone_with_vm() -> TrieZone {
    let zone = TrieZone::new();
    zone.add_soa("mirage.io", 60, 42);
    zone.add_a("mirage.io", 60, Ipv4Addr::new(10, 0, 0, 7));
    zone
}

#[test]
fn test_a_lookup_hits() {
    let zone = zone_with_vm();
    let answer = zone.answer("mirage.io", RecordType::A);

    assert_eq!(answer.rcode, Rcode::NoError);
    assert_eq!(answer.records.len(), 1);
    assert_eq!(answer.records[0].ttl, 60);
    assert_eq!(
        answer.records[0].data,
        RecordData::A(Ipv4Addr::new(10, 0, 0, 7))
    );
}

#[test]
fn test_lookup_is_case_insensitive_and_ignores_trailing_dot() {
    let zone = zone_with_vm();
    assert!(zone.has("MIRAGE.IO", RecordType::A));
    assert!(zone.has("mirage.io.", RecordType::A));
    assert!(zone.has("Mirage.Io.", RecordType::SOA));
}

#[test]
fn test_unknown_name_is_nxdomain() {
    let zone = zone_with_vm();
    let answer = zone.answer("unknown.example", RecordType::A);
    assert_eq!(answer.rcode, Rcode::NxDomain);
    assert!(answer.records.is_empty());
    assert!(!zone.has("unknown.example", RecordType::A));
}

#[test]
fn test_prefix_of_existing_name_is_nxdomain() {
    let zone = TrieZone::new();
    zone.add_a("www.mirage.io", 60, Ipv4Addr::new(10, 0, 0, 7));

    // "mirage.io" is only an interior trie node, not a registered name.
    assert_eq!(zone.answer("mirage.io", RecordType::A).rcode, Rcode::NxDomain);
}

#[test]
fn test_known_name_without_qtype_is_nodata() {
    let zone = zone_with_vm();
    let answer = zone.answer("mirage.io", RecordType::TXT);

    assert_eq!(answer.rcode, Rcode::NoError);
    assert!(answer.records.is_empty());
}

#[test]
fn test_soa_defaults_derive_from_ttl() {
    let zone = zone_with_vm();
    let answer = zone.answer("mirage.io", RecordType::SOA);
    assert_eq!(answer.records.len(), 1);

    let RecordData::Soa(soa) = &answer.records[0].data else {
        panic!("expected SOA data");
    };
    assert_eq!(soa.serial, 42);
    assert_eq!(soa.refresh, 60);
    assert_eq!(soa.retry, 3);
    assert_eq!(soa.expire, 120);
    assert_eq!(soa.minimum, 120);
    assert_eq!(soa.mname.as_ref(), "mirage.io");
}

#[test]
fn test_soa_installs_ns_record_too() {
    let zone = zone_with_vm();
    let answer = zone.answer("mirage.io", RecordType::NS);
    assert_eq!(answer.records.len(), 1);
    assert_eq!(
        answer.records[0].data,
        RecordData::Ns("mirage.io".into())
    );
}

#[test]
fn test_repeated_add_a_replaces_record() {
    let zone = zone_with_vm();
    zone.add_a("mirage.io", 30, Ipv4Addr::new(10, 0, 0, 8));

    let answer = zone.answer("mirage.io", RecordType::A);
    assert_eq!(answer.records.len(), 1);
    assert_eq!(answer.records[0].ttl, 30);
    assert_eq!(
        answer.records[0].data,
        RecordData::A(Ipv4Addr::new(10, 0, 0, 8))
    );
}

#[test]
fn test_sibling_names_do_not_collide() {
    let zone = TrieZone::new();
    zone.add_a("www.mirage.io", 60, Ipv4Addr::new(10, 0, 0, 7));
    zone.add_a("db.mirage.io", 60, Ipv4Addr::new(10, 0, 0, 8));

    let www = zone.answer("www.mirage.io", RecordType::A);
    let db = zone.answer("db.mirage.io", RecordType::A);
    assert_eq!(www.records[0].data, RecordData::A(Ipv4Addr::new(10, 0, 0, 7)));
    assert_eq!(db.records[0].data, RecordData::A(Ipv4Addr::new(10, 0, 0, 8)));
}
