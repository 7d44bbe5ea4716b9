// Name-keyed storage shared by the graph types.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) trait Named {
    fn name(&self) -> &str;
}

// A panicking driver must not wedge the graph, so poisoned locks are
// recovered rather than propagated.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Insert `item`, replacing any entry with the same name in place.
pub(crate) fn upsert<T: Named>(slots: &RwLock<Vec<Arc<T>>>, item: Arc<T>) -> Option<Arc<T>> {
    let mut slots = write(slots);
    match slots.iter().position(|s| s.name() == item.name()) {
        Some(idx) => Some(std::mem::replace(&mut slots[idx], item)),
        None => {
            slots.push(item);
            None
        }
    }
}

pub(crate) fn find<T: Named>(slots: &RwLock<Vec<Arc<T>>>, name: &str) -> Option<Arc<T>> {
    read(slots).iter().find(|s| s.name() == name).cloned()
}

pub(crate) fn take<T: Named>(slots: &RwLock<Vec<Arc<T>>>, name: &str) -> Option<Arc<T>> {
    let mut slots = write(slots);
    let idx = slots.iter().position(|s| s.name() == name)?;
    Some(slots.remove(idx))
}

pub(crate) fn snapshot<T>(slots: &RwLock<Vec<Arc<T>>>) -> Vec<Arc<T>> {
    read(slots).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slot(&'static str, u8);

    impl Named for Slot {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn upsert_replaces_in_place_and_keeps_order() {
        let slots = RwLock::new(Vec::new());
        assert!(upsert(&slots, Arc::new(Slot("a", 1))).is_none());
        assert!(upsert(&slots, Arc::new(Slot("b", 1))).is_none());
        let old = upsert(&slots, Arc::new(Slot("a", 2))).unwrap();
        assert_eq!(old.1, 1);

        let names: Vec<_> = snapshot(&slots).iter().map(|s| (s.0, s.1)).collect();
        assert_eq!(names, vec![("a", 2), ("b", 1)]);
    }

    #[test]
    fn find_and_take_are_exact() {
        let slots = RwLock::new(vec![Arc::new(Slot("led", 0))]);
        assert!(find(&slots, "LED").is_none());
        assert!(find(&slots, "led").is_some());
        assert!(take(&slots, "le").is_none());
        assert!(take(&slots, "led").is_some());
        assert!(snapshot(&slots).is_empty());
    }
}
