// ── Side table of live radio links ──
//
// Peripherals in a snapshot carry a `LinkHandle`; the link object itself
// lives here, owned by the registry. Taking a handle out of the table
// releases the registry's ownership.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::model::LinkHandle;
use crate::radio::RadioLink;

pub(crate) struct LinkTable {
    links: DashMap<LinkHandle, Arc<dyn RadioLink>>,
    next: AtomicU64,
}

impl LinkTable {
    pub(crate) fn new() -> Self {
        Self {
            links: DashMap::new(),
            next: AtomicU64::new(1),
        }
    }

    pub(crate) fn insert(&self, link: Arc<dyn RadioLink>) -> LinkHandle {
        let handle = LinkHandle(self.next.fetch_add(1, Ordering::Relaxed));
        self.links.insert(handle, link);
        handle
    }

    pub(crate) fn get(&self, handle: LinkHandle) -> Option<Arc<dyn RadioLink>> {
        self.links.get(&handle).map(|r| Arc::clone(r.value()))
    }

    pub(crate) fn take(&self, handle: LinkHandle) -> Option<Arc<dyn RadioLink>> {
        self.links.remove(&handle).map(|(_, link)| link)
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }
}
