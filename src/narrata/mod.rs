pub mod client;
pub mod demo;
pub mod showcase;
pub mod types;
pub mod upload;
pub mod variants;
pub mod viz;
