// Service abstractions handed to the session controller at construction

pub mod progress;
pub mod session;

pub use progress::ProgressApi;
pub use session::{
    AssetSelection, SelectionState, SessionTokenStore, StaticToken,
    TokenProvider,
};
