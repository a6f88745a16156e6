mod errors;
mod media;
mod membership;
mod room;
mod session;
mod signaling;

pub use errors::*;
pub use media::*;
pub use membership::*;
pub use room::*;
pub use session::*;
pub use signaling::*;
