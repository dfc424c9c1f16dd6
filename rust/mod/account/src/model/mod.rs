mod session;
mod upload;
mod user;

pub use session::*;
pub use upload::*;
pub use user::*;
