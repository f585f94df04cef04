use thiserror::Error;
use uuid::Uuid;

/// Main client error type.
///
/// Every variant carries full technical detail for logging and maps to a
/// pre-formatted user-facing message via [`Error::user_message`], so
/// presentation code never needs to branch on error internals.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Request could not be sent or completed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a status code other than the expected one.
    #[error("Unexpected status code: {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body could not be decoded.
    #[error("Body decode error: {0}")]
    Decode(String),

    /// Request body serialization failed.
    #[error("Body encode error: {0}")]
    Encode(String),

    /// WebSocket connection-level failure.
    #[error("Websocket error: {0}")]
    Websocket(String),

    /// Outbound WebSocket send failure.
    #[error("WS send error: {0}")]
    WsSend(String),

    /// A user-initiated action referenced a session that is no longer present.
    #[error("Order session not found: {0}")]
    SessionNotFound(Uuid),

    /// The voucher PDF could not be rendered.
    #[error("Voucher render error: {0}")]
    VoucherRender(String),

    /// The voucher PDF could not be written to disk.
    #[error("Voucher persist error: {0}")]
    VoucherPersist(String),

    /// The configured base URL is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Pre-formatted message suitable for showing to the user.
    ///
    /// Technical detail stays in the variant payload and the logs; the UI
    /// only ever sees these strings.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Transport(_) => "Unable to reach the server. Check your connection.",
            Error::UnexpectedStatus { .. }
            | Error::Decode(_)
            | Error::Encode(_)
            | Error::InvalidUrl(_) => "Something went wrong. Please try again.",
            Error::Websocket(_) | Error::WsSend(_) => "Lost connection to the live order feed.",
            Error::SessionNotFound(_) => "This order session no longer exists.",
            Error::VoucherRender(_) => "Unable to generate the PDF.",
            Error::VoucherPersist(_) => "Unable to save the PDF.",
        }
    }
}
