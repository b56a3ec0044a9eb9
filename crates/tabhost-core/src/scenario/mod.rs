mod reader;
mod types;

pub use reader::ScenarioReader;
pub use types::*;
