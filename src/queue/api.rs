//! Public API for the queue system
//!
//! External modules should import from here rather than directly from
//! internal modules. See the module documentation for usage and architecture.

// Consumer and producer-side handle
pub use crate::queue::consumer::{Consumer, ConsumerBuilder, ConsumerHandle};

// Hook contract
pub use crate::queue::handler::{Callbacks, ConsumerHandler, HookError, HookResult};

// Observability
pub use crate::queue::events::{ConsumerEvent, ConsumerEventType, EventSink, LogEventSink};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
