//! Rendering of form state and generated characters
//!
//! Rendering never mutates state: [`view`] derives a display model from a
//! [`crate::controller::FormState`], and the [`text`] and [`html`] modules
//! turn it into terminal output or a standalone HTML page.

pub mod html;
pub mod text;
pub mod view;

pub use html::render_page;
pub use text::{render_character, render_status};
pub use view::{CharacterView, FormView, ListItem, Section, SectionBody};

pub const GENERATE_LABEL: &str = "✨ Generate Character";
pub const BUSY_LABEL: &str = "⚡ Generating...";
pub const YOKAI_TYPE_HINT: &str = "e.g., kitsune, oni, tengu, kappa, jorogumo";
pub const ELEMENT_HINT: &str = "e.g., fire, water, ice, lightning, wind";
