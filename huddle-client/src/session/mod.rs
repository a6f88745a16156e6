mod peer_session;
mod registry;
mod session_command;

pub use peer_session::*;
pub use registry::*;
pub use session_command::*;
