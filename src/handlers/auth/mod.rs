pub mod login;
pub mod oauth;
pub mod register;

pub use login::{handle_login, handle_me};
pub use oauth::{google_callback, google_login};
pub use register::handle_register;
