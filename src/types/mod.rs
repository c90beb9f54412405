pub mod date;
pub mod user;

pub use date::Date;
pub use user::{User, UserFields};
