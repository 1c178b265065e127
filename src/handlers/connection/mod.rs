//! Connection and registration handlers.
//!
//! Handles PASS, NICK, USER, QUIT commands.

mod nick;
mod pass;
mod quit;
mod user;
mod welcome;

pub use nick::NickHandler;
pub use pass::PassHandler;
pub use quit::QuitHandler;
pub use user::UserHandler;
pub use welcome::try_complete_registration;
