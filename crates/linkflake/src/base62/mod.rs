mod encode;
mod interface;
mod short_code;

pub use encode::*;
pub use interface::*;
pub use short_code::*;
