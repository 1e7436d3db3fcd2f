// Library interface for newsly modules
// This allows tests and other binaries to import modules

pub mod classifier;
pub mod sentiment;
pub mod news;
pub mod timefmt;
pub mod topics;
pub mod server;
