//! Trackable resources (TRES).
//!
//! The common model keys TRES by type, or `type/name` for typed resources
//! such as `gres/gpu`. Memory quantities are always megabytes.

use std::collections::BTreeMap;

use tracing::debug;

/// Resource type name to quantity.
pub type TresMap = BTreeMap<String, u64>;

/// Key Slurm uses for memory.
pub const MEMORY_KEY: &str = "mem";

const KIB_PER_MIB: f64 = 1024.0;

/// Parse a Slurm TRES string such as `cpu=4,mem=16G,gres/gpu=2`.
///
/// Memory values are normalised to megabytes (`K`, `M`, `G`, `T` suffixes;
/// a bare number is already megabytes). Entries that cannot be parsed are
/// skipped.
#[must_use]
pub fn parse_tres_string(input: &str) -> TresMap {
    let mut map = TresMap::new();

    for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((key, raw)) = entry.split_once('=') else {
            debug!(entry, "Skipping TRES entry without '='");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            debug!(entry, "Skipping TRES entry without a type");
            continue;
        }

        let quantity = if key == MEMORY_KEY {
            parse_memory_mb(raw.trim())
        } else {
            raw.trim().parse::<u64>().ok()
        };

        match quantity {
            Some(value) => {
                map.insert(key.to_string(), value);
            }
            None => debug!(entry, "Skipping TRES entry with unparseable quantity"),
        }
    }

    map
}

/// Render a TRES map as `cpu=8,mem=1024,gres/gpu=2`, in key order.
#[must_use]
pub fn format_tres_string(map: &TresMap) -> String {
    map.iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a memory quantity into megabytes.
///
/// Accepts an optional `K`, `M`, `G` or `T` suffix and a fractional part
/// (`1.50G`).
#[must_use]
pub fn parse_memory_mb(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (number, factor) = match raw.chars().last()? {
        'K' | 'k' => (&raw[..raw.len() - 1], 1.0 / KIB_PER_MIB),
        'M' | 'm' => (&raw[..raw.len() - 1], 1.0),
        'G' | 'g' => (&raw[..raw.len() - 1], KIB_PER_MIB),
        'T' | 't' => (&raw[..raw.len() - 1], KIB_PER_MIB * KIB_PER_MIB),
        _ => (raw, 1.0),
    };

    if let Ok(whole) = number.parse::<u64>() {
        if (factor - 1.0).abs() < f64::EPSILON {
            return Some(whole);
        }
    }

    let value = number.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * factor).ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn test_parse_basic() {
        let map = parse_tres_string("cpu=4,mem=1024,node=1,billing=4");
        assert_eq!(map.get("cpu"), Some(&4));
        assert_eq!(map.get("mem"), Some(&1024));
        assert_eq!(map.get("node"), Some(&1));
        assert_eq!(map.get("billing"), Some(&4));
    }

    #[test]
    fn test_parse_typed_gres() {
        let map = parse_tres_string("cpu=8,gres/gpu=2,gres/gpu:a100=2");
        assert_eq!(map.get("gres/gpu"), Some(&2));
        assert_eq!(map.get("gres/gpu:a100"), Some(&2));
    }

    #[test_case("16G", 16384 ; "gigabytes")]
    #[test_case("1024M", 1024 ; "megabytes")]
    #[test_case("2048", 2048 ; "bare is megabytes")]
    #[test_case("1T", 1_048_576 ; "terabytes")]
    #[test_case("2048K", 2 ; "kilobytes")]
    #[test_case("1.50G", 1536 ; "fractional gigabytes")]
    fn test_parse_memory(raw: &str, expected: u64) {
        assert_eq!(parse_memory_mb(raw), Some(expected));
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let map = parse_tres_string("cpu=4,,=3,garbage,mem=lots,node=2");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("cpu"), Some(&4));
        assert_eq!(map.get("node"), Some(&2));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_tres_string("").is_empty());
        assert!(parse_tres_string(" , ").is_empty());
    }

    #[test]
    fn test_format_orders_by_key() {
        let mut map = TresMap::new();
        map.insert("mem".into(), 1024);
        map.insert("cpu".into(), 8);
        map.insert("gres/gpu".into(), 2);
        assert_eq!(format_tres_string(&map), "cpu=8,gres/gpu=2,mem=1024");
    }

    proptest! {
        #[test]
        fn prop_format_then_parse_preserves_map(
            map in proptest::collection::btree_map("[a-z]{1,6}(/[a-z]{1,6})?", 0u64..1_000_000, 0..8)
        ) {
            let rendered = format_tres_string(&map);
            prop_assert_eq!(parse_tres_string(&rendered), map);
        }
    }
}
