//! Notification primitives used by the solve-event fabric.
//!
//! An [`Event`] is a list of handlers invoked synchronously, in registration
//! order, every time the event is triggered. Handlers block the caller; the
//! solver fires events inline from its iteration loop.

/// A handler attached to an [`Event`].
pub type Handler<T> = Box<dyn FnMut(&T) + Send>;

/// A handler attached to an [`Event2`].
pub type Handler2<A, B> = Box<dyn FnMut(&A, &B) + Send>;

/// An event with a single payload.
pub struct Event<T> {
    handlers: Vec<Handler<T>>,
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Event<T> {
    /// Creates an event with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Adds a handler for this event.
    pub fn register<F>(&mut self, handler: F)
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Invokes every handler with the payload, in registration order.
    pub fn trigger(&mut self, payload: &T) {
        for handler in &mut self.handlers {
            handler(payload);
        }
    }
}

/// An event with two payloads.
pub struct Event2<A, B> {
    handlers: Vec<Handler2<A, B>>,
}

impl<A, B> Default for Event2<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> Event2<A, B> {
    /// Creates an event with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Adds a handler for this event.
    pub fn register<F>(&mut self, handler: F)
    where
        F: FnMut(&A, &B) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Invokes every handler with both payloads, in registration order.
    pub fn trigger(&mut self, a: &A, b: &B) {
        for handler in &mut self.handlers {
            handler(a, b);
        }
    }
}

impl<T> std::fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<A, B> std::fmt::Debug for Event2<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event2")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
