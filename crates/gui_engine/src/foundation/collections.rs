//! Specialized collection types

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle to an element inside a widget's element table
    pub struct ElementId;

    /// Handle to a widget owned by the GUI manager
    pub struct WidgetId;
}

/// A lazily recomputed value with an explicit validity flag
///
/// Used for derived state (widget bounds, element layout) that is cheap to
/// invalidate but expensive to recompute on every query.
#[derive(Debug, Clone, Default)]
pub struct Cached<T> {
    value: T,
    valid: bool,
}

impl<T> Cached<T> {
    /// Create an invalid cache holding a placeholder value
    pub fn new(placeholder: T) -> Self {
        Self {
            value: placeholder,
            valid: false,
        }
    }

    /// Mark the cached value stale
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Whether the cached value is up to date
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Return the cached value, recomputing it first if stale
    pub fn get_or_update(&mut self, update: impl FnOnce() -> T) -> &T {
        if !self.valid {
            self.value = update();
            self.valid = true;
        }
        &self.value
    }

    /// Last computed value, whether or not it is still valid
    pub fn last(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_recomputes_only_when_invalid() {
        let mut cached = Cached::new(0);
        let mut calls = 0;

        assert_eq!(*cached.get_or_update(|| { calls += 1; 5 }), 5);
        assert_eq!(*cached.get_or_update(|| { calls += 1; 6 }), 5);
        assert_eq!(calls, 1);

        cached.invalidate();
        assert!(!cached.is_valid());
        assert_eq!(*cached.get_or_update(|| { calls += 1; 7 }), 7);
        assert_eq!(calls, 2);
    }
}
