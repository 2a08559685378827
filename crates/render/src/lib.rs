//! HTML render surfaces for the deck pipeline.
//!
//! A shared DOM builder over resolved layout regions feeds both the
//! interactive editor view and the standalone viewer document, so the
//! two surfaces cannot drift apart.

pub mod dom;
pub mod editor;
pub mod surface;
pub mod viewer;

pub use dom::Element;
pub use editor::{render_slide, render_slide_html, render_thumbnail, render_thumbnail_html};
pub use surface::{slide_element, RenderMode};
pub use viewer::viewer_document;
