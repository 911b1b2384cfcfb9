pub mod acquisition;
pub mod decoder;
pub mod encoder;
pub mod resample;

pub use acquisition::{acquire, acquire_file};
