//! Terminal user interface components for the label preview.

mod help;
pub mod preview;
pub mod settings;
mod theme;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;
