mod digest;
mod error;
mod reference;
mod repository;

pub use digest::Digest;
pub use error::Error;
pub use reference::ImageReference;
pub use repository::Repository;
