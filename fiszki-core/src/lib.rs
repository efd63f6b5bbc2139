pub mod errors;
pub mod models;
pub mod repo;
pub mod scheduler;
pub mod session;
pub mod shuffle;
pub mod stats;
pub mod study;

pub use errors::*;
pub use models::*;
pub use repo::*;
pub use scheduler::*;
pub use session::*;
pub use shuffle::*;
pub use stats::*;
pub use study::*;
