pub mod types;
pub mod queries;
pub mod conditions;

pub use types::*;
pub use queries::*;
pub use conditions::*;
