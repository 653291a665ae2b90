pub mod types;
pub mod classification;

pub use types::MuxError;
pub use classification::ErrorKind;
