mod draw;
pub mod network;
pub mod projection;
pub mod scatter;
pub mod types;
