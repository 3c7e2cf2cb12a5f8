pub mod builder;
pub mod session;
pub mod store;

pub use builder::*;
pub use session::*;
pub use store::*;
