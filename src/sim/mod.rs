pub mod app;
pub mod command;
pub mod credits;
pub mod event;
pub mod home;
pub mod overlay;
pub mod route;
pub mod sequencer;
pub mod session;
pub mod timer;
