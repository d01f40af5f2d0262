pub mod errors;

pub use errors::{ConvertError, ConvertResult};
