mod record;
mod results;

pub use record::*;
pub use results::*;
