pub mod media_devices;
pub mod media_probe;
pub mod media_recorder;
pub mod session_delegate;
pub mod submission;
