// ── Ordered copy-on-write device list ──
//
// Every mutation produces a new list; readers holding an older list
// keep seeing it unchanged. Order is insertion order.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::model::{DeviceId, IpDevice, Peripheral};

/// Anything stored in a [`DeviceList`].
pub trait Listed {
    fn list_id(&self) -> &DeviceId;
}

impl Listed for IpDevice {
    fn list_id(&self) -> &DeviceId {
        &self.info.id
    }
}

impl Listed for Peripheral {
    fn list_id(&self) -> &DeviceId {
        &self.info.id
    }
}

/// An immutable, cheaply cloneable list of devices of one variant.
#[derive(Serialize)]
#[serde(transparent)]
pub struct DeviceList<T> {
    items: Arc<Vec<Arc<T>>>,
}

impl<T> Clone for DeviceList<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for DeviceList<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DeviceList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> FromIterator<Arc<T>> for DeviceList<T> {
    fn from_iter<I: IntoIterator<Item = Arc<T>>>(iter: I) -> Self {
        Self {
            items: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<T: Listed> DeviceList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<T>> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Arc<T>] {
        &self.items
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Arc<T>> {
        self.items.iter().find(|item| item.list_id() == id)
    }

    pub fn contains(&self, id: &DeviceId) -> bool {
        self.get(id).is_some()
    }

    /// Whether both handles point at the same underlying list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// A new list with `item` appended.
    pub(crate) fn with_pushed(&self, item: T) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(Arc::new(item));
        Self {
            items: Arc::new(items),
        }
    }

    /// A new list with `id` rewritten by `f`, or `None` if absent.
    pub(crate) fn with_updated(&self, id: &DeviceId, f: impl FnOnce(&mut T)) -> Option<Self>
    where
        T: Clone,
    {
        let index = self.items.iter().position(|item| item.list_id() == id)?;
        let mut items: Vec<Arc<T>> = self.items.as_ref().clone();
        let mut updated = T::clone(&items[index]);
        f(&mut updated);
        items[index] = Arc::new(updated);
        Some(Self {
            items: Arc::new(items),
        })
    }

    /// A new list without `id`, plus the removed entry.
    pub(crate) fn without(&self, id: &DeviceId) -> Option<(Self, Arc<T>)> {
        let index = self.items.iter().position(|item| item.list_id() == id)?;
        let mut items: Vec<Arc<T>> = self.items.as_ref().clone();
        let removed = items.remove(index);
        Some((
            Self {
                items: Arc::new(items),
            },
            removed,
        ))
    }
}

impl<'a, T> IntoIterator for &'a DeviceList<T> {
    type Item = &'a Arc<T>;
    type IntoIter = std::slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
