//! Event capture for assertions.

use std::sync::{Arc, Mutex};

/// Records every event handed to its listeners. Clones share the log.
pub struct EventRecorder<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E: Clone + Send + 'static> EventRecorder<E> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A listener suitable for an event bus subscription.
    pub fn listener(&self) -> Box<dyn Fn(&E) + Send + Sync> {
        let events = Arc::clone(&self.events);
        Box::new(move |event: &E| {
            events
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event.clone());
        })
    }

    pub fn events(&self) -> Vec<E> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl<E> Clone for EventRecorder<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E: Clone + Send + 'static> Default for EventRecorder<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_records_in_order() {
        let recorder = EventRecorder::<u32>::new();
        let listener = recorder.listener();
        listener(&1);
        listener(&2);
        assert_eq!(recorder.events(), vec![1, 2]);
        recorder.clear();
        assert!(recorder.is_empty());
    }
}
