mod account;
mod identity;
mod resolution;
mod user;

pub use account::*;
pub use identity::*;
pub use resolution::*;
pub use user::*;
