pub mod reader;
pub mod schema;

pub use reader::RecordReader;
pub use schema::*;
