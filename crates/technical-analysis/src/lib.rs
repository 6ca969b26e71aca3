pub mod indicators;
pub mod summary;


pub use indicators::*;
pub use summary::*;
