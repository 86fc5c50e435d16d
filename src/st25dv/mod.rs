//! Writing into the user memory of an ST25DV dynamic NFC tag.

pub mod allocator;
pub mod session;
pub mod transport;

pub use allocator::Allocator;
pub use session::Session;
pub use transport::{Link, Port, Suspend, Transport};
