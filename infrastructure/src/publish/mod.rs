//! Publishing adapters

pub mod command;

pub use command::{CommandPublisher, DEFAULT_PUBLISH_COMMAND, Program, PublishStrategy};
