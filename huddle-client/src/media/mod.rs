mod peer_connection;
mod source;

pub use peer_connection::*;
pub use source::*;
