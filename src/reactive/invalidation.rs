use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

bitflags! {
    /// Flags describing what a dispatched job changed
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChangeFlags: u8 {
        /// Visual appearance changed, the host should repaint
        const NEEDS_PAINT   = 0b01;
        /// A transition flipped which face of its content is shown
        const FACE_SWAPPED  = 0b10;
    }
}

impl Default for ChangeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Unique identifier for a widget instance
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct WidgetId(u64);

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

impl WidgetId {
    /// Generate a new unique widget ID
    pub fn next() -> Self {
        WidgetId(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_ids_are_unique() {
        let a = WidgetId::next();
        let b = WidgetId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_change_flags_accumulate() {
        let mut flags = ChangeFlags::default();
        assert!(flags.is_empty());
        flags |= ChangeFlags::NEEDS_PAINT;
        flags |= ChangeFlags::FACE_SWAPPED;
        assert!(flags.contains(ChangeFlags::NEEDS_PAINT | ChangeFlags::FACE_SWAPPED));
    }
}
