pub mod file_store;

pub mod token_store;

pub use file_store::FileTokenStore;
pub use token_store::{HeadlessTokenStore, MemoryTokenStore, TokenPair, TokenStore};
