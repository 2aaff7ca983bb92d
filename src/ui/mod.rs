pub mod audio;
pub mod client;
pub mod gamepad;
pub mod input;
pub mod renderer;
