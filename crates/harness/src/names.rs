//! Generated names and identifiers for objects a scenario creates.

use rand::Rng;
use time::macros::format_description;
use time::OffsetDateTime;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `{short}_{case}_{resource}_{HHmmss_fff}`.
pub fn resource_name(short: &str, case: &str, resource: &str) -> String {
    let stamp = OffsetDateTime::now_utc()
        .format(format_description!(
            "[hour][minute][second]_[subsecond digits:3]"
        ))
        .unwrap_or_default();
    if case.is_empty() {
        format!("{}_{}_{}", short, resource, stamp)
    } else {
        format!("{}_{}_{}_{}", short, case, resource, stamp)
    }
}

/// `len` random characters from `A`–`Z`.
pub fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| UPPERCASE[rng.gen_range(0..UPPERCASE.len())] as char)
        .collect()
}

/// A random version-4 GUID in lowercase `8-4-4-4-12` form.
pub fn new_guid() -> String {
    let mut bytes: [u8; 16] = rand::thread_rng().gen();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Whether `s` has the `8-4-4-4-12` hex shape, optionally wrapped in braces.
pub fn is_guid(s: &str) -> bool {
    let s = s
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(s);
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.bytes().all(|b| b.is_ascii_hexdigit()))
}
