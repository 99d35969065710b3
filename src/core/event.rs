//! Event identity as seen by the dispatcher.
//!
//! The dispatcher never inspects an event's payload. It only needs the
//! small integer id to choose a handler; the handler itself receives the
//! concrete event and matches on it.

/// Identifier of an event type.
pub type EventId = u16;

/// Anything that can be dispatched to a state machine.
///
/// # Example
///
/// ```rust
/// use statetree::core::{Event, EventId};
///
/// enum Door {
///     Open,
///     Close,
/// }
///
/// impl Event for Door {
///     fn id(&self) -> EventId {
///         match self {
///             Self::Open => 0,
///             Self::Close => 1,
///         }
///     }
/// }
///
/// assert_eq!(Door::Close.id(), 1);
/// ```
pub trait Event {
    /// The id used to select a handler.
    fn id(&self) -> EventId;
}

/// Bare ids are events without payload.
impl Event for EventId {
    fn id(&self) -> EventId {
        *self
    }
}
