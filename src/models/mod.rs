pub mod roster;
pub mod time;


pub use roster::*;
pub use time::*;
