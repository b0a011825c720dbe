pub mod error;
mod diagnostic;
mod reading;
mod snapshot;
mod zone;

pub use diagnostic::*;
pub use reading::*;
pub use snapshot::*;
pub use zone::*;

pub static CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
