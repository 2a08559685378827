//! Core domain types, layout resolution, deck normalization, and the
//! editing session for the document-to-deck pipeline.

pub mod error;
pub mod layout;
pub mod normalize;
pub mod session;
pub mod types;

pub use error::{Error, Result};
pub use layout::{resolve, EditTarget, Region, ResolvedSlide};
pub use session::{GenerationTicket, Phase, Session, SlideEdit};
pub use types::{Presentation, Slide, SlideLayout};
