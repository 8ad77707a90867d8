use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum WaveUpdateSet {
    Input,
    Simulate,
    Upload,
    Ui,
}
