//! Opaque identifier generation.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate an opaque identifier of the form `<prefix>_<random><millis>`,
/// both components hex-encoded. The random component carries the
/// uniqueness; the clock component alone cannot distinguish rapid
/// successive calls.
///
/// The random source is not cryptographically secure. Identifiers double as
/// bearer secrets here, so a deployment with real secrecy requirements must
/// swap this for a CSPRNG-backed generator.
pub fn generate(prefix: &str) -> String {
    let random: u64 = rand::thread_rng().gen();
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{}_{:016x}{:x}", prefix, random, millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn carries_prefix() {
        let id = generate("doc");
        assert!(id.starts_with("doc_"));
    }

    #[test]
    fn distinct_across_rapid_calls() {
        let ids: HashSet<String> = (0..1000).map(|_| generate("id")).collect();
        assert_eq!(ids.len(), 1000);
    }
}
