//! Intent matching for chat messages.

mod dispatcher;
mod matching;
mod rules;

pub use dispatcher::Assistant;
