//! TRES lists on the wire, TRES maps in the common model.

use slurm_types::TresMap;
use slurm_wire::WireTres;
use tracing::debug;

/// Collapse a wire TRES list into a map keyed by `type` or `type/name`.
///
/// Entries without a type or a count, or with a negative count, are
/// skipped. A later duplicate key wins.
#[must_use]
pub fn to_common(entries: &[WireTres]) -> TresMap {
    let mut map = TresMap::new();
    for entry in entries {
        let Some(kind) = entry.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) else {
            debug!(?entry, "Skipping TRES entry without a type");
            continue;
        };
        let Some(count) = entry.count.and_then(|c| u64::try_from(c).ok()) else {
            debug!(?entry, "Skipping TRES entry without a usable count");
            continue;
        };
        let key = match entry.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => format!("{kind}/{name}"),
            None => kind.to_string(),
        };
        map.insert(key, count);
    }
    map
}

/// Expand a map into a wire TRES list in key order.
///
/// Counts above `i64::MAX` are clamped and an empty name after `/` is
/// dropped. Both are logged, since they do not survive a round trip.
#[must_use]
pub fn to_wire(map: &TresMap) -> Vec<WireTres> {
    map.iter()
        .map(|(key, count)| {
            let (kind, name) = match key.split_once('/') {
                Some((kind, "")) => {
                    debug!(key = %key, "Dropping empty TRES name");
                    (kind, None)
                }
                Some((kind, name)) => (kind, Some(name.to_string())),
                None => (key.as_str(), None),
            };
            let count = i64::try_from(*count).unwrap_or_else(|_| {
                debug!(key = %key, count, "Clamping TRES count to i64::MAX");
                i64::MAX
            });
            WireTres {
                kind: Some(kind.to_string()),
                name,
                id: None,
                count: Some(count),
            }
        })
        .collect()
}
