pub mod store;
pub mod projector;
pub mod prompt;
pub mod notices;
pub mod assistant;
pub mod upload;

pub use store::ConversationStore;
pub use projector::project;
pub use prompt::*;
pub use notices::*;
pub use assistant::*;
pub use upload::*;
