pub mod init;
pub mod runner;
pub mod snapshot;

pub use init::{build_app, init, HeadlessOptions};
pub use runner::{RunProgress, RunSettings};
pub use snapshot::{load_snapshot, save_snapshot, HeightSnapshot};
