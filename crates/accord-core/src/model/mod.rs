//! Entity and value types: associations, items, and the message thread.

pub mod association;
pub mod item;
pub mod message;

pub use association::Association;
pub use item::{Item, ItemPatch};
pub use message::{Message, MessageThread};
