pub mod clock;
pub mod handler;
