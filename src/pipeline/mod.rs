pub mod extraction;
pub mod completion;
pub mod chat;
