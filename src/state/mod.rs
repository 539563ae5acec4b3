mod registry;

pub use registry::{RecordingRegistry, RegistryEntry, PAUSE_LABEL, PLAY_LABEL};
