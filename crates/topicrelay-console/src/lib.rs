//! Console loopback adapter for the topic relay.
//!
//! Reads operator input line by line, turns each line into
//! [`InboundContent`](topicrelay_core::InboundContent) for a
//! [`Relay`](topicrelay_app::Relay), and writes the reply back. Topic
//! creation and delivery are simulated by the [`loopback`] collaborators.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod line;
pub mod loopback;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use topicrelay_app::{ChannelAdmin, ContentDelivery, Relay};
use topicrelay_core::{ActorId, TopicRegistry};

pub use error::ConsoleError;
pub use line::{ConsoleLine, parse_line};

/// Feed every line of `input` to `relay` and write the replies to `output`.
///
/// Lines without an `@actor` prefix come from `operator`. Returns when the
/// input is exhausted.
pub async fn run<A, D, R, I, O>(
    relay: &Relay<A, D, R>,
    operator: ActorId,
    input: I,
    mut output: O,
) -> Result<(), ConsoleError>
where
    A: ChannelAdmin,
    D: ContentDelivery,
    R: TopicRegistry,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let reply = match parse_line(&line, operator) {
            Ok(None) => continue,
            Ok(Some(ConsoleLine { actor, content })) => relay.handle(actor, content).await,
            Err(error) => topicrelay_app::Reply::line(error.to_string()),
        };
        if reply.is_empty() {
            continue;
        }

        output.write_all(reply.to_string().as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    Ok(())
}
