pub mod arff;
pub mod item_stream;

pub use arff::{ArffFileStream, read_item_set};
pub use item_stream::ItemStream;
