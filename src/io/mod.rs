pub mod discovery;
pub mod output;

pub use discovery::discover_images;
pub use output::{create_writer, DirectoryReport, OutputFormat, OutputWriter};
