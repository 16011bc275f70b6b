//! Deep-link parsing, routing, and deferred navigation.

pub mod listener;
pub mod parser;
pub mod resolver;

pub use listener::{register_link_listener, ChannelLinkSource, LinkSource, LinkSubscription};
pub use parser::parse_link;
pub use resolver::LinkResolver;
