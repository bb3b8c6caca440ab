use std::collections::BTreeMap;

use srk_schemas::MovementEvent;

/// Applied movements grouped by stock key, in application order.
#[derive(Clone, Debug, Default)]
pub struct MovementHistory {
    enabled: bool,
    by_key: BTreeMap<i64, Vec<MovementEvent>>,
}

impl MovementHistory {
    pub fn new() -> Self {
        Self {
            enabled: true,
            by_key: BTreeMap::new(),
        }
    }

    /// A history that drops everything it is given.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, ev: MovementEvent) {
        if self.enabled {
            self.by_key.entry(ev.stock_key).or_default().push(ev);
        }
    }

    pub fn for_key(&self, key: i64) -> &[MovementEvent] {
        self.by_key.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.by_key.keys().copied()
    }

    /// Total number of recorded movements across all keys.
    pub fn len(&self) -> usize {
        self.by_key.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srk_schemas::MovementKind;

    #[test]
    fn disabled_history_records_nothing() {
        let mut h = MovementHistory::disabled();
        h.record(MovementEvent::new(1, 1, MovementKind::Delete));
        assert!(h.is_empty());
        assert!(h.for_key(1).is_empty());
    }

    #[test]
    fn keys_are_ordered() {
        let mut h = MovementHistory::new();
        h.record(MovementEvent::new(3, 20, MovementKind::Delete));
        h.record(MovementEvent::new(2, 10, MovementKind::Delete));
        h.record(MovementEvent::new(1, 20, MovementKind::GoodsReceipt));
        assert_eq!(h.keys().collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(h.for_key(20).len(), 2);
        assert_eq!(h.len(), 3);
    }
}
