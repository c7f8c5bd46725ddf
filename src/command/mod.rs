mod error;
pub mod triangulate;

pub use error::Error;
