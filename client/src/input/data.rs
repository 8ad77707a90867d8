use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WaveAction {
    ToggleWireframe,
    Pause,
    Reset,
    Disturb,
    Quit,
}
