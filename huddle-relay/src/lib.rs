mod config;
mod meetings;
mod routes;
mod ws;

pub use config::*;
pub use meetings::*;
pub use routes::*;
pub use ws::*;
