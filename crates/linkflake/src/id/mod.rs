mod node;
mod snowflake;

pub use node::*;
pub use snowflake::*;
