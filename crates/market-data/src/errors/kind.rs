use serde::Serialize;

/// Classification of a fetch failure.
///
/// Polling sessions keep the kind next to the user-facing message so the
/// rendering layer can tell a rate limit apart from a broken request.
///
/// # Behavior Summary
///
/// | Kind | Cached? | Next poll retries? |
/// |------|---------|--------------------|
/// | `RateLimited` | No | Yes |
/// | `Network` | No | Yes |
/// | `Payload` | No | Yes |
/// | `Request` | No | No (the URL itself is wrong) |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Upstream or proxy answered with HTTP 429.
    RateLimited,

    /// Non-success status or a transport failure.
    Network,

    /// The body could not be parsed as JSON.
    Payload,

    /// The request could not be built (unknown provider, empty symbol).
    Request,
}

impl ErrorKind {
    /// Whether the scheduled poll should simply try again on its next tick.
    pub fn is_transient(self) -> bool {
        !matches!(self, Self::Request)
    }
}
