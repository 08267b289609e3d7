pub mod content;
pub mod inquiry;
pub mod shared;
