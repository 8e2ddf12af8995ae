//! The per-instance hook slot table.
//!
//! Slots are claimed by call order. The first successful render fixes the
//! slot count; from then on every claim is checked against the kind and
//! value type recorded when the slot was created.

use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};
use crate::reactive::Cleanup;

/// Which hook created a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum SlotKind {
    State = 0,
    Memo = 1,
    Effect = 2,
    Ref = 3,
    Input = 4,
    Child = 5,
}

impl SlotKind {
    fn hook_name(self) -> &'static str {
        match self {
            SlotKind::State => "use_state",
            SlotKind::Memo => "use_memo",
            SlotKind::Effect => "use_effect",
            SlotKind::Ref => "use_ref",
            SlotKind::Input => "use_input",
            SlotKind::Child => "child",
        }
    }
}

/// Hook kind plus value type, as shown in mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotTag {
    pub kind: SlotKind,
    pub type_name: &'static str,
}

impl SlotTag {
    pub fn of<T: 'static>(kind: SlotKind) -> Self {
        Self {
            kind,
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl fmt::Display for SlotTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.kind.hook_name(), self.type_name)
    }
}

pub(crate) struct HookSlot {
    tag: SlotTag,
    value: Box<dyn Any>,
    cleanup: Option<Cleanup>,
}

/// Result of claiming the next slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
    /// Created on an earlier render.
    Existing(usize),
    /// First render of this slot; the caller must [`HookTable::push`] it.
    New(usize),
}

pub(crate) struct HookTable {
    component: &'static str,
    slots: Vec<HookSlot>,
    cursor: usize,
    /// Set once a render has completed; the slot count is fixed from then on.
    sealed: bool,
}

impl HookTable {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            slots: Vec::new(),
            cursor: 0,
            sealed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Slots claimed so far in the current render.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn begin_render(&mut self) {
        self.cursor = 0;
    }

    pub fn claim(&mut self, tag: SlotTag) -> Result<Claim> {
        let index = self.cursor;
        self.cursor += 1;
        match self.slots.get(index) {
            Some(slot) if slot.tag == tag => Ok(Claim::Existing(index)),
            Some(slot) => Err(Error::HookKindMismatch {
                component: self.component.to_string(),
                index,
                expected: slot.tag.to_string(),
                found: tag.to_string(),
            }),
            None if self.sealed => Err(Error::HookCountMismatch {
                component: self.component.to_string(),
                expected: self.slots.len(),
                found: index + 1,
            }),
            None => Ok(Claim::New(index)),
        }
    }

    pub fn push<T: 'static>(&mut self, tag: SlotTag, value: T, cleanup: Option<Cleanup>) {
        debug_assert_eq!(self.slots.len() + 1, self.cursor);
        self.slots.push(HookSlot {
            tag,
            value: Box::new(value),
            cleanup,
        });
    }

    pub fn get<T: Clone + 'static>(&self, index: usize) -> Option<T> {
        self.slots.get(index)?.value.downcast_ref::<T>().cloned()
    }

    /// Check the slot count at the end of a render and seal the table.
    pub fn finish_render(&mut self) -> Result<()> {
        if self.sealed && self.cursor != self.slots.len() {
            return Err(Error::HookCountMismatch {
                component: self.component.to_string(),
                expected: self.slots.len(),
                found: self.cursor,
            });
        }
        self.sealed = true;
        Ok(())
    }

    /// Empty the table, returning slot cleanups newest first.
    pub fn drain_cleanups(&mut self) -> Vec<Cleanup> {
        let slots = std::mem::take(&mut self.slots);
        self.cursor = 0;
        slots.into_iter().rev().filter_map(|s| s.cleanup).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn first_render(table: &mut HookTable) {
        table.begin_render();
        for tag in [SlotTag::of::<i32>(SlotKind::State), SlotTag::of::<String>(SlotKind::Ref)] {
            assert!(matches!(table.claim(tag), Ok(Claim::New(_))));
            table.push(tag, 0i32, None);
        }
        table.finish_render().unwrap();
    }

    #[test]
    fn test_same_order_reuses_slots() {
        let mut table = HookTable::new("Demo");
        first_render(&mut table);

        table.begin_render();
        assert_eq!(table.claim(SlotTag::of::<i32>(SlotKind::State)).unwrap(), Claim::Existing(0));
        assert_eq!(table.claim(SlotTag::of::<String>(SlotKind::Ref)).unwrap(), Claim::Existing(1));
        assert!(table.finish_render().is_ok());
        assert_eq!(table.get::<i32>(0), Some(0));
    }

    #[test]
    fn test_kind_mismatch_names_slot() {
        let mut table = HookTable::new("Demo");
        first_render(&mut table);

        table.begin_render();
        let err = table.claim(SlotTag::of::<i32>(SlotKind::Memo)).unwrap_err();
        match err {
            Error::HookKindMismatch { component, index, expected, found } => {
                assert_eq!(component, "Demo");
                assert_eq!(index, 0);
                assert_eq!(expected, "use_state<i32>");
                assert_eq!(found, "use_memo<i32>");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_count_mismatch_both_ways() {
        let mut table = HookTable::new("Demo");
        first_render(&mut table);

        table.begin_render();
        table.claim(SlotTag::of::<i32>(SlotKind::State)).unwrap();
        assert!(matches!(
            table.finish_render(),
            Err(Error::HookCountMismatch { expected: 2, found: 1, .. })
        ));

        table.begin_render();
        table.claim(SlotTag::of::<i32>(SlotKind::State)).unwrap();
        table.claim(SlotTag::of::<String>(SlotKind::Ref)).unwrap();
        assert!(matches!(
            table.claim(SlotTag::of::<u8>(SlotKind::Effect)),
            Err(Error::HookCountMismatch { expected: 2, found: 3, .. })
        ));
    }

    #[test]
    fn test_cleanups_drain_newest_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut table = HookTable::new("Demo");
        table.begin_render();
        for name in ["a", "b", "c"] {
            let tag = SlotTag::of::<()>(SlotKind::Effect);
            table.claim(tag).unwrap();
            let log = log.clone();
            table.push(tag, (), Some(Box::new(move || log.borrow_mut().push(name))));
        }
        for cleanup in table.drain_cleanups() {
            cleanup();
        }
        assert_eq!(*log.borrow(), vec!["c", "b", "a"]);
        assert_eq!(table.len(), 0);
    }
}
