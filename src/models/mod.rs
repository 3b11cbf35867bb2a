pub mod channel;
pub mod note;
pub mod presentation;
pub mod quiz;
pub mod script;
pub mod session;
pub mod tabulation;
pub mod user;

pub use channel::*;
pub use note::*;
pub use presentation::*;
pub use quiz::*;
pub use script::*;
pub use session::*;
pub use tabulation::*;
pub use user::*;
