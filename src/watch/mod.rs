//! Change detection and subscriber notification pipeline.
//!
//! The [`poller::ChangePoller`] diffs vault revisions on a fixed interval
//! and hands change sets to the [`broadcaster::EventBroadcaster`], which
//! filters them per subscriber and pushes onto bounded drop-oldest queues.

pub mod broadcaster;
pub mod event;
pub mod pattern;
pub mod poller;
pub mod queue;
mod subscriber;

pub use broadcaster::EventBroadcaster;
pub use event::{ChangeSet, OutboundEvent};
pub use pattern::KeyPattern;
pub use poller::{ChangePoller, RevisionSnapshot};
pub use queue::EventQueue;
pub use subscriber::Subscription;
