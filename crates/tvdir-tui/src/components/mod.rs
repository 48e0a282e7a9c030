pub mod directory;
pub mod footer;
pub mod header;
pub mod ticker;
