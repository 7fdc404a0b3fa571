//! Indirect object storage.
//!
//! Object numbers are indices into a growable arena: they are assigned
//! sequentially from 1, never reused, and never renumbered.

use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};

/// Arena of indirect objects, keyed by object number.
#[derive(Debug, Default)]
pub struct ObjectTable {
    /// Slot `i` holds object number `i + 1`. `None` is a reserved, unwritten slot.
    slots: Vec<Option<Object>>,
}

impl ObjectTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ref(&self) -> ObjectRef {
        ObjectRef::new(self.slots.len() as u32 + 1, 0)
    }

    /// Append an object and return its number.
    pub fn add(&mut self, obj: Object) -> ObjectRef {
        let r = self.next_ref();
        self.slots.push(Some(obj));
        r
    }

    /// Allocate a number whose body will be written later.
    ///
    /// Needed for forward references, e.g. a page pointing at the page
    /// tree that lists it.
    pub fn reserve(&mut self) -> ObjectRef {
        let r = self.next_ref();
        self.slots.push(None);
        r
    }

    /// Write the body of a reserved slot. Each slot is written exactly once.
    pub fn fill(&mut self, r: ObjectRef, obj: Object) -> Result<()> {
        let slot = r
            .id
            .checked_sub(1)
            .and_then(|i| self.slots.get_mut(i as usize))
            .ok_or_else(|| Error::Configuration(format!("object {} was never reserved", r.id)))?;
        if slot.is_some() {
            return Err(Error::Configuration(format!("object {} is already written", r.id)));
        }
        *slot = Some(obj);
        Ok(())
    }

    /// Number of allocated objects (reserved or written).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no object has been allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Look up a written object.
    pub fn get(&self, r: ObjectRef) -> Option<&Object> {
        let index = r.id.checked_sub(1)? as usize;
        self.slots.get(index)?.as_ref()
    }

    /// Iterate over all objects in ascending number order.
    ///
    /// Fails on the first reserved slot that was never written, or on any
    /// reference that points outside the table.
    pub fn entries(&self) -> Result<Vec<(ObjectRef, &Object)>> {
        let mut out = Vec::with_capacity(self.slots.len());
        for (i, slot) in self.slots.iter().enumerate() {
            let id = i as u32 + 1;
            let obj = slot.as_ref().ok_or(Error::UnfilledObject(id))?;
            if let Some(dangling) = obj
                .references()
                .into_iter()
                .find(|r| r.id == 0 || r.id as usize > self.slots.len())
            {
                return Err(Error::DanglingReference(format!(
                    "object {} refers to missing object {}",
                    id, dangling.id
                )));
            }
            out.push((ObjectRef::new(id, 0), obj));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_numbering() {
        let mut table = ObjectTable::new();
        assert_eq!(table.add(Object::Null).id, 1);
        assert_eq!(table.reserve().id, 2);
        assert_eq!(table.add(Object::Integer(3)).id, 3);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_fill_reserved_slot_once() {
        let mut table = ObjectTable::new();
        let r = table.reserve();
        table.fill(r, Object::Integer(1)).unwrap();
        assert_eq!(table.get(r), Some(&Object::Integer(1)));
        assert!(table.fill(r, Object::Integer(2)).is_err());
    }

    #[test]
    fn test_fill_unknown_slot() {
        let mut table = ObjectTable::new();
        assert!(table.fill(ObjectRef::new(0, 0), Object::Null).is_err());
        assert!(table.fill(ObjectRef::new(4, 0), Object::Null).is_err());
    }

    #[test]
    fn test_entries_rejects_unfilled() {
        let mut table = ObjectTable::new();
        table.add(Object::Null);
        table.reserve();
        assert!(matches!(table.entries(), Err(Error::UnfilledObject(2))));
    }

    #[test]
    fn test_entries_rejects_dangling_reference() {
        let mut table = ObjectTable::new();
        table.add(Object::reference(ObjectRef::new(9, 0)));
        assert!(matches!(table.entries(), Err(Error::DanglingReference(_))));
    }

    #[test]
    fn test_entries_in_order() {
        let mut table = ObjectTable::new();
        let later = table.reserve();
        table.add(Object::reference(later));
        table.fill(later, Object::Boolean(true)).unwrap();
        let ids: Vec<u32> = table.entries().unwrap().iter().map(|(r, _)| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
