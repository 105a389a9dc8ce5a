//! Per-widget polling sessions.
//!
//! A [`PollingSession`] resolves its URL through the shared
//! [`FetchCache`](crate::cache::FetchCache) once on start and then on a fixed
//! interval, publishing [`SessionState`] snapshots through a watch channel.

mod session;
mod state;

pub use session::{PollSpec, PollingSession, MAX_REFRESH_INTERVAL_SECS};
pub use state::{SessionError, SessionState};
