pub mod conversation;
pub mod enums;

pub use conversation::*;
pub use enums::{InvalidEnum, Language, Role};
