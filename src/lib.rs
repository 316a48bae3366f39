pub mod apdu;
pub mod card;
pub mod fs;
pub mod iso;
pub mod server;
pub mod status;

pub use card::Card;
pub use iso::IsoSession;
pub use status::{IsoError, IsoResult};
