//! Value encoding and attribute type resolution.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::catalog::{self, ValueKind};
use crate::error::{AttrError, Result};

/// Length of the Unity split-network blob: four address bytes, four mask
/// bytes, six reserved zero bytes.
pub const SUBNET_BLOB_LEN: usize = 14;

/// Outcome of resolving a keyword and raw value into a storable attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttribute {
    /// Final value kind after reconciliation with the catalog.
    pub kind: ValueKind,
    /// Type code selected for this operation.
    pub type_code: u16,
    /// IPv6-variant code, retained only for value-less resolutions of
    /// dual-family keywords so a delete can match either family.
    pub type_code_v6: Option<u16>,
    /// Canonical binary encoding of the value; empty for value-less deletes.
    pub blob: Vec<u8>,
}

/// Resolve `keyword` plus an optional `(kind, raw value)` pair into a
/// storable attribute.
///
/// The raw value is encoded according to its declared kind first,
/// independently of the catalog. The result is then reconciled against the
/// catalog entry for `keyword`: a hex-declared value is accepted for any
/// entry (the generic escape form), and dual-family keywords select their
/// IPv4 or IPv6 type code from the address family of the value. Keywords
/// absent from the catalog are accepted as literal decimal type codes.
///
/// # Errors
///
/// Returns [`AttrError::UnknownAttribute`] when the keyword is neither a
/// catalog entry nor a decimal type code, [`AttrError::TypeMismatch`] when
/// the declared kind conflicts with the catalog, and [`AttrError::Encoding`]
/// when the raw value cannot be encoded or does not fit the keyword's
/// address family.
pub fn resolve(keyword: &str, value: Option<(ValueKind, &str)>) -> Result<ResolvedAttribute> {
    let (declared, blob, addr) = match value {
        Some((kind, raw)) => {
            let (blob, addr) = encode(keyword, kind, raw)?;
            (Some(kind), blob, addr)
        }
        None => (None, Vec::new(), None),
    };

    let Some(def) = catalog::lookup(keyword) else {
        return resolve_numeric(keyword, declared, blob);
    };

    let Some(declared) = declared else {
        // Value-less delete: adopt the catalog entry wholesale so the caller
        // can match either family.
        return Ok(ResolvedAttribute {
            kind: def.kind,
            type_code: def.type_code,
            type_code_v6: def.type_code_v6,
            blob,
        });
    };

    if declared != def.kind && declared != ValueKind::Hex {
        return Err(AttrError::TypeMismatch {
            keyword: keyword.to_string(),
            expected: def.kind,
        });
    }

    let type_code = if declared == ValueKind::Hex && def.kind == ValueKind::Address {
        // Hex escape for an address attribute: the payload length decides
        // the family.
        match blob.len() {
            4 => def.type_code,
            16 => def
                .type_code_v6
                .ok_or_else(|| no_ipv6_variant(keyword))?,
            _ => {
                return Err(AttrError::Encoding {
                    keyword: keyword.to_string(),
                    value: None,
                    reason: "requires a valid IP address",
                });
            }
        }
    } else if let Some(ip) = addr {
        match ip {
            IpAddr::V4(_) => def.type_code,
            IpAddr::V6(_) => def
                .type_code_v6
                .ok_or_else(|| no_ipv6_variant(keyword))?,
        }
    } else {
        def.type_code
    };

    Ok(ResolvedAttribute {
        kind: def.kind,
        type_code,
        type_code_v6: None,
        blob,
    })
}

/// Render a stored attribute value for human display.
///
/// Uses catalog knowledge of the type code to decode addresses, strings and
/// subnets; values of unknown codes or unexpected lengths are rendered as
/// lowercase hex.
#[must_use]
pub fn display_value(type_code: u16, blob: &[u8]) -> String {
    let kind = catalog::lookup_by_code(type_code).map_or(ValueKind::Hex, |def| def.kind);
    match kind {
        ValueKind::String => String::from_utf8_lossy(blob).into_owned(),
        ValueKind::Address => display_address(blob),
        ValueKind::Subnet => display_subnet(blob),
        ValueKind::Hex => hex::encode(blob),
    }
}

fn resolve_numeric(
    keyword: &str,
    declared: Option<ValueKind>,
    blob: Vec<u8>,
) -> Result<ResolvedAttribute> {
    let type_code = keyword
        .parse::<u16>()
        .map_err(|_| AttrError::UnknownAttribute {
            keyword: keyword.to_string(),
        })?;
    Ok(ResolvedAttribute {
        kind: declared.unwrap_or(ValueKind::Hex),
        type_code,
        type_code_v6: None,
        blob,
    })
}

fn encode(keyword: &str, kind: ValueKind, raw: &str) -> Result<(Vec<u8>, Option<IpAddr>)> {
    match kind {
        ValueKind::String => Ok((raw.as_bytes().to_vec(), None)),
        ValueKind::Hex => {
            let blob = hex::decode(raw).map_err(|_| AttrError::Encoding {
                keyword: keyword.to_string(),
                value: Some(raw.to_string()),
                reason: "value is not valid hexadecimal",
            })?;
            Ok((blob, None))
        }
        ValueKind::Address => {
            let ip: IpAddr = raw.parse().map_err(|_| AttrError::Encoding {
                keyword: keyword.to_string(),
                value: Some(raw.to_string()),
                reason: "value is not an IP address",
            })?;
            Ok((address_bytes(ip), Some(ip)))
        }
        ValueKind::Subnet => Ok((encode_subnet(keyword, raw)?, None)),
    }
}

fn address_bytes(ip: IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

fn encode_subnet(keyword: &str, raw: &str) -> Result<Vec<u8>> {
    let invalid = |reason: &'static str| AttrError::Encoding {
        keyword: keyword.to_string(),
        value: Some(raw.to_string()),
        reason,
    };

    let (net, mask) = raw
        .split_once('/')
        .ok_or_else(|| invalid("subnet is missing the '/' separator"))?;
    if net.is_empty() || mask.is_empty() {
        return Err(invalid("subnet is missing an address or mask"));
    }
    let net: Ipv4Addr = net
        .parse()
        .map_err(|_| invalid("network half is not an IPv4 address"))?;
    let mask: Ipv4Addr = mask
        .parse()
        .map_err(|_| invalid("mask half is not an IPv4 address"))?;

    let mut blob = vec![0u8; SUBNET_BLOB_LEN];
    blob[..4].copy_from_slice(&net.octets());
    blob[4..8].copy_from_slice(&mask.octets());
    Ok(blob)
}

fn no_ipv6_variant(keyword: &str) -> AttrError {
    AttrError::Encoding {
        keyword: keyword.to_string(),
        value: None,
        reason: "has no IPv6 variant",
    }
}

fn display_address(blob: &[u8]) -> String {
    if let Ok(octets) = <[u8; 4]>::try_from(blob) {
        Ipv4Addr::from(octets).to_string()
    } else if let Ok(octets) = <[u8; 16]>::try_from(blob) {
        Ipv6Addr::from(octets).to_string()
    } else {
        hex::encode(blob)
    }
}

fn display_subnet(blob: &[u8]) -> String {
    if blob.len() == SUBNET_BLOB_LEN {
        let net = Ipv4Addr::new(blob[0], blob[1], blob[2], blob[3]);
        let mask = Ipv4Addr::new(blob[4], blob[5], blob[6], blob[7]);
        format!("{net}/{mask}")
    } else {
        hex::encode(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    #[test]
    fn ipv4_literal_selects_primary_code() {
        let resolved = resolve("dns", Some((ValueKind::Address, "8.8.8.8"))).expect("resolve");
        assert_eq!(resolved.kind, ValueKind::Address);
        assert_eq!(resolved.type_code, types::INTERNAL_IP4_DNS);
        assert_eq!(resolved.type_code_v6, None);
        assert_eq!(resolved.blob, vec![8, 8, 8, 8]);
    }

    #[test]
    fn ipv6_literal_selects_v6_code() {
        let resolved =
            resolve("dns", Some((ValueKind::Address, "2001:db8::1"))).expect("resolve");
        assert_eq!(resolved.kind, ValueKind::Address);
        assert_eq!(resolved.type_code, types::INTERNAL_IP6_DNS);
        assert_eq!(resolved.blob.len(), 16);
        assert_eq!(resolved.blob[0], 0x20);
        assert_eq!(resolved.blob[15], 0x01);
    }

    #[test]
    fn ipv6_literal_rejected_without_v6_variant() {
        let err = resolve("internal_ip4_dns", Some((ValueKind::Address, "2001:db8::1")))
            .expect_err("single-family keyword");
        assert!(matches!(
            err,
            AttrError::Encoding {
                reason: "has no IPv6 variant",
                ..
            }
        ));
    }

    #[test]
    fn hex_payload_reconciles_to_address_family() {
        let v4 = resolve("dns", Some((ValueKind::Hex, "08080808"))).expect("4-byte payload");
        assert_eq!(v4.kind, ValueKind::Address);
        assert_eq!(v4.type_code, types::INTERNAL_IP4_DNS);

        let v6 = resolve(
            "dns",
            Some((ValueKind::Hex, "20010db8000000000000000000000001")),
        )
        .expect("16-byte payload");
        assert_eq!(v6.type_code, types::INTERNAL_IP6_DNS);

        let err = resolve("dns", Some((ValueKind::Hex, "0808"))).expect_err("2-byte payload");
        assert!(matches!(
            err,
            AttrError::Encoding {
                reason: "requires a valid IP address",
                ..
            }
        ));
    }

    #[test]
    fn sixteen_byte_hex_rejected_without_v6_variant() {
        let err = resolve(
            "internal_ip4_dns",
            Some((ValueKind::Hex, "20010db8000000000000000000000001")),
        )
        .expect_err("single-family keyword");
        assert!(matches!(
            err,
            AttrError::Encoding {
                reason: "has no IPv6 variant",
                ..
            }
        ));
    }

    #[test]
    fn hex_escape_keeps_catalog_kind_for_strings() {
        let resolved = resolve("banner", Some((ValueKind::Hex, "68690a"))).expect("resolve");
        assert_eq!(resolved.kind, ValueKind::String);
        assert_eq!(resolved.type_code, types::UNITY_BANNER);
        assert_eq!(resolved.blob, vec![0x68, 0x69, 0x0a]);
    }

    #[test]
    fn subnet_blob_layout_is_fixed() {
        let resolved = resolve(
            "unity_split_include",
            Some((ValueKind::Subnet, "10.0.0.0/255.255.255.0")),
        )
        .expect("resolve");
        assert_eq!(resolved.kind, ValueKind::Subnet);
        assert_eq!(resolved.type_code, types::UNITY_SPLIT_INCLUDE);
        assert_eq!(
            resolved.blob,
            vec![0x0a, 0, 0, 0, 0xff, 0xff, 0xff, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn subnet_rejects_malformed_input() {
        for raw in [
            "10.0.0.0",
            "10.0.0.0/",
            "/255.255.255.0",
            "10.0.0.0/notamask",
            "2001:db8::/ffff::",
        ] {
            assert!(
                resolve("unity_local_lan", Some((ValueKind::Subnet, raw))).is_err(),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn type_mismatch_names_expected_kind() {
        let err = resolve("banner", Some((ValueKind::Address, "8.8.8.8")))
            .expect_err("banner is a string attribute");
        assert!(matches!(
            err,
            AttrError::TypeMismatch {
                expected: ValueKind::String,
                ..
            }
        ));
    }

    #[test]
    fn string_value_stored_verbatim() {
        let resolved =
            resolve("version", Some((ValueKind::String, "gateway 7.2"))).expect("resolve");
        assert_eq!(resolved.type_code, types::APPLICATION_VERSION);
        assert_eq!(resolved.blob, b"gateway 7.2".to_vec());
    }

    #[test]
    fn value_less_lookup_adopts_catalog_entry() {
        let dual = resolve("wins", None).expect("resolve");
        assert_eq!(dual.kind, ValueKind::Address);
        assert_eq!(dual.type_code, types::INTERNAL_IP4_NBNS);
        assert_eq!(dual.type_code_v6, Some(types::INTERNAL_IP6_NBNS));
        assert!(dual.blob.is_empty());

        let single = resolve("unity_banner", None).expect("resolve");
        assert_eq!(single.type_code_v6, None);
    }

    #[test]
    fn numeric_keyword_falls_back_to_hex() {
        let bare = resolve("25", None).expect("resolve");
        assert_eq!(bare.kind, ValueKind::Hex);
        assert_eq!(bare.type_code, 25);
        assert_eq!(bare.type_code_v6, None);
        assert!(bare.blob.is_empty());

        let typed = resolve("25", Some((ValueKind::Hex, "2a"))).expect("resolve");
        assert_eq!(typed.blob, vec![0x2a]);
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        let err = resolve("foobar", Some((ValueKind::Hex, "2a"))).expect_err("not numeric");
        assert!(matches!(err, AttrError::UnknownAttribute { .. }));
    }

    #[test]
    fn invalid_hex_is_rejected() {
        let err = resolve("dns", Some((ValueKind::Hex, "zz"))).expect_err("invalid hex");
        assert!(matches!(
            err,
            AttrError::Encoding {
                reason: "value is not valid hexadecimal",
                ..
            }
        ));
    }

    #[test]
    fn display_round_trips_known_kinds() {
        assert_eq!(display_value(types::INTERNAL_IP4_DNS, &[8, 8, 8, 8]), "8.8.8.8");

        let subnet = resolve(
            "unity_split_include",
            Some((ValueKind::Subnet, "10.0.0.0/255.255.255.0")),
        )
        .expect("resolve")
        .blob;
        assert_eq!(
            display_value(types::UNITY_SPLIT_INCLUDE, &subnet),
            "10.0.0.0/255.255.255.0"
        );

        assert_eq!(display_value(types::UNITY_BANNER, b"welcome"), "welcome");
        assert_eq!(display_value(40000, &[0xde, 0xad]), "dead");
    }
}
