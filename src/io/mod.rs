mod local;
mod reader;

pub use local::open_archive;
pub use reader::RecordReader;
