pub mod inputs;
pub mod plan;
pub mod results;
pub mod types;

pub use inputs::*;
pub use plan::*;
pub use results::*;
pub use types::*;
