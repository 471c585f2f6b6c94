//! Topicrelay application layer.
//!
//! Async glue that wraps [`topicrelay_core`]'s Sans-IO session engine with
//! real collaborators. The transport adapter turns platform updates into
//! [`InboundContent`](topicrelay_core::InboundContent) and hands them to a
//! [`Relay`], which applies them one at a time, creates topics and delivers
//! committed batches, and answers with a [`Reply`].
//!
//! # Components
//!
//! - [`Relay`]: serialized engine access plus collaborator execution
//! - [`ChannelAdmin`], [`ContentDelivery`]: capabilities the adapter provides
//! - [`Command`]: slash command parsing
//! - [`Reply`]: operator-facing rendering

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod collaborator;
mod command;
mod relay;
mod reply;

pub use collaborator::{ChannelAdmin, ContentDelivery, DeliveryRequest};
pub use command::{Command, CommandError};
pub use relay::{Relay, RelayConfig};
pub use reply::Reply;
