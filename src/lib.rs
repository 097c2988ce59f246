#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod diagram;
pub mod family;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use diagram::Diagram;
pub use family::{FamilyGraph, Gender, Person};
pub use parser::parse_family;
pub use render::render_svg;
pub use theme::Theme;
