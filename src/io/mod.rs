pub mod config_io;
pub mod saver;
pub mod store;
