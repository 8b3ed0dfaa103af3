//! Terminal display for the CLI

pub mod colors;
pub mod icons;
pub mod table;

pub use colors::ColorTheme;
pub use icons::StatusIcon;
pub use table::{ArtifactState, ArtifactStatus, TableRenderer};
