use huddle_core::{IceCandidate, SessionDescription};

/// Mailbox items for one peer session task. The FIFO mailbox is what
/// keeps a single session's negotiation steps strictly ordered while
/// different sessions run concurrently.
#[derive(Debug)]
pub enum SessionCommand {
    /// Both sides are ready and the local side holds the offerer role.
    StartOffer,
    RemoteOffer(SessionDescription),
    RemoteAnswer(SessionDescription),
    RemoteCandidate(IceCandidate),
    Close,
}
