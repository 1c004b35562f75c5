//! In-memory collaborators for tests and headless hosts.
//!
//! Every fake is a cheap handle over shared state: keep one clone for
//! assertions and hand the other to the controller.

pub mod progress;
pub mod streaming;
pub mod surface;

pub use progress::{RecordedCall, RecordingProgressApi};
pub use streaming::FakeStreamingBackend;
pub use surface::FakeSurface;
