use crate::error::{GridError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU32;

/// A canvas-unique identifier for elements (components and connections).
/// Positive, assigned monotonically, never reused. 4 bytes, Copy, O(1) Eq/Hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(NonZeroU32);

impl ElementId {
    /// Wrap a raw id. Returns `None` for 0, which the data format uses to
    /// mean "no element" (e.g. an unattached connection end).
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(ElementId)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Encode an optional id the way the data format does: `None` → 0.
    pub fn raw_or_zero(id: Option<ElementId>) -> u32 {
        id.map_or(0, ElementId::get)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.get())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        ElementId::new(raw).ok_or_else(|| serde::de::Error::custom("element id must be positive"))
    }
}

/// Monotonic id source owned by the canvas. Ids are handed out once and
/// never reused, even after the element is removed.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: NonZeroU32,
    /// `next` was already handed out and nothing follows it.
    exhausted: bool,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: NonZeroU32::MIN,
            exhausted: false,
        }
    }

    /// The id the next call to [`IdAllocator::next_id`] returns.
    pub fn peek(&self) -> ElementId {
        ElementId(self.next)
    }

    /// Hand out the next id. Fails once `u32::MAX` has been used.
    pub fn next_id(&mut self) -> Result<ElementId> {
        if self.exhausted {
            return Err(GridError::IdsExhausted);
        }
        let id = ElementId(self.next);
        self.advance_past(id);
        Ok(id)
    }

    /// Restore the counter from persisted data. Values of 0 are treated as 1.
    pub fn restore(&mut self, next: u32) {
        self.next = NonZeroU32::new(next).unwrap_or(NonZeroU32::MIN);
        self.exhausted = false;
    }

    /// Make sure `id` can never be handed out again.
    pub fn reserve(&mut self, id: ElementId) {
        if !self.exhausted && id.0 >= self.next {
            self.advance_past(id);
        }
    }

    fn advance_past(&mut self, id: ElementId) {
        match id.0.checked_add(1) {
            Some(next) => self.next = next,
            None => {
                self.next = id.0;
                self.exhausted = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_start_at_one() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id().unwrap();
        let b = ids.next_id().unwrap();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(ids.peek().get(), 3);
    }

    #[test]
    fn zero_is_not_an_id() {
        assert!(ElementId::new(0).is_none());
        assert_eq!(ElementId::raw_or_zero(None), 0);
        assert_eq!(ElementId::raw_or_zero(ElementId::new(7)), 7);
    }

    #[test]
    fn reserve_skips_past_restored_ids() {
        let mut ids = IdAllocator::new();
        ids.restore(3);
        ids.reserve(ElementId::new(9).unwrap());
        assert_eq!(ids.next_id().unwrap().get(), 10);

        // Reserving an older id never moves the counter backwards.
        ids.reserve(ElementId::new(2).unwrap());
        assert_eq!(ids.next_id().unwrap().get(), 11);
    }

    #[test]
    fn the_last_id_is_handed_out_once() {
        let mut ids = IdAllocator::new();
        ids.restore(u32::MAX);
        assert_eq!(ids.next_id().unwrap().get(), u32::MAX);
        assert_eq!(ids.next_id(), Err(GridError::IdsExhausted));

        // An imported element holding the last id exhausts the counter too.
        let mut ids = IdAllocator::new();
        ids.restore(7);
        ids.reserve(ElementId::new(u32::MAX).unwrap());
        assert_eq!(ids.next_id(), Err(GridError::IdsExhausted));
    }

    #[test]
    fn deserialize_rejects_zero() {
        let parsed: std::result::Result<ElementId, _> = serde_json::from_str("0");
        assert!(parsed.is_err());
        let parsed: ElementId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed.get(), 42);
    }
}
