//! Remote control for mapedit - line-delimited JSON over TCP
//!
//! Start the server next to your editor:
//! ```ignore
//! let handler = Arc::new(Mutex::new(editor));
//! let server = RemoteServer::bind(handler, DEFAULT_PORT).await?;
//! ```

pub mod protocol;
pub mod server;

pub use protocol::*;
pub use server::{RemoteError, RemoteHandler, RemoteServer};

/// Default remote control port
pub const DEFAULT_PORT: u16 = 9743;
