mod local_bus;
mod publisher;
mod signal_bus;
mod signaling_output;

pub use local_bus::*;
pub use publisher::*;
pub use signal_bus::*;
pub use signaling_output::*;
