//! Host environment registry
//!
//! The host owns the callback sources (scroll listeners and one-shot timers).
//! Controllers acquire a [`Registration`] when they mount and release it by
//! dropping it, so every exit path (explicit unmount, early return, panic
//! unwinding) leaves the host with no dangling callbacks.
//!
//! Everything runs on the single UI thread, so the registry is `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

/// Kind of callback source a registration holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ScrollListener,
    Timer,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    scroll_listeners: BTreeSet<u64>,
    timers: BTreeSet<u64>,
}

impl Registry {
    fn set_mut(&mut self, kind: ResourceKind) -> &mut BTreeSet<u64> {
        match kind {
            ResourceKind::ScrollListener => &mut self.scroll_listeners,
            ResourceKind::Timer => &mut self.timers,
        }
    }
}

/// Handle to the host's callback registry. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct Host {
    registry: Rc<RefCell<Registry>>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a passive scroll listener
    pub fn listen_scroll(&self) -> Registration {
        self.register(ResourceKind::ScrollListener)
    }

    /// Register a pending one-shot timer
    pub fn schedule_timer(&self) -> Registration {
        self.register(ResourceKind::Timer)
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.registry.borrow().scroll_listeners.len()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.registry.borrow().timers.len()
    }

    fn register(&self, kind: ResourceKind) -> Registration {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.set_mut(kind).insert(id);
        tracing::trace!(id, ?kind, "host resource registered");

        Registration {
            id,
            kind,
            registry: Rc::downgrade(&self.registry),
        }
    }
}

/// Scoped ownership of one host callback. Dropping it unregisters the callback.
#[derive(Debug)]
pub struct Registration {
    id: u64,
    kind: ResourceKind,
    registry: Weak<RefCell<Registry>>,
}

impl Registration {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Whether the host still holds this callback
    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let registry = registry.borrow();
        match self.kind {
            ResourceKind::ScrollListener => registry.scroll_listeners.contains(&self.id),
            ResourceKind::Timer => registry.timers.contains(&self.id),
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        // Host may already be gone during teardown
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().set_mut(self.kind).remove(&self.id);
            tracing::trace!(id = self.id, kind = ?self.kind, "host resource released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_released_on_drop() {
        let host = Host::new();
        let listener = host.listen_scroll();
        let timer = host.schedule_timer();
        assert_eq!(host.scroll_listener_count(), 1);
        assert_eq!(host.pending_timer_count(), 1);
        assert!(listener.is_active());

        drop(listener);
        assert_eq!(host.scroll_listener_count(), 0);
        assert_eq!(host.pending_timer_count(), 1);

        drop(timer);
        assert_eq!(host.pending_timer_count(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let host = Host::new();
        let a = host.listen_scroll();
        let b = host.listen_scroll();
        let c = host.schedule_timer();
        assert_ne!(a.id(), b.id());
        assert_ne!(b.id(), c.id());
        assert_eq!(c.kind(), ResourceKind::Timer);
    }

    #[test]
    fn test_released_when_unwinding() {
        let host = Host::new();
        let cloned = host.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _listener = cloned.listen_scroll();
            panic!("render failed");
        }));
        assert!(result.is_err());
        assert_eq!(host.scroll_listener_count(), 0);
    }

    #[test]
    fn test_drop_after_host_is_gone() {
        let host = Host::new();
        let listener = host.listen_scroll();
        drop(host);
        assert!(!listener.is_active());
        drop(listener);
    }
}
