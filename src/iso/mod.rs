pub mod handlers;
pub mod session;
pub mod session_state;
pub mod types;
pub mod utils;

pub use session::IsoSession;
pub use session_state::*;
