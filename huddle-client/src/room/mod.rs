mod config;
mod coordinator;
mod handle;
mod room_command;
mod room_event;

pub use config::*;
pub use coordinator::*;
pub use handle::*;
pub use room_command::*;
pub use room_event::*;
