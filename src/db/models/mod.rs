mod lease;
mod property;
mod tenant;

pub use lease::*;
pub use property::*;
pub use tenant::*;
