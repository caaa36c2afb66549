mod hash;
pub use hash::*;
mod json;
pub use json::*;
mod load;
pub use load::*;
pub mod logging;
