pub mod client;
pub mod compiler;
pub mod connection;

pub use client::*;
pub use compiler::*;
pub use connection::*;
