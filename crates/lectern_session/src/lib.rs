pub mod session;

pub use session::{Message, SessionStore};
