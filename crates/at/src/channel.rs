//! Logical channel lifecycle

/// State of the card logical channel owned by a session
///
/// The channel is opened explicitly through
/// [`AtTransport::open_channel`](crate::AtTransport::open_channel).
/// `Failed` is sticky: a failed open is never retried behind the caller's
/// back, only an explicit close followed by a new open leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    /// No logical channel is established
    #[default]
    Closed,
    /// A logical channel is open under the contained id
    Open(u8),
    /// The most recent open attempt failed
    Failed,
}

impl ChannelState {
    /// Whether a channel is currently open
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// The open channel id, if any
    pub const fn channel_id(&self) -> Option<u8> {
        match self {
            Self::Open(id) => Some(*id),
            _ => None,
        }
    }
}
