mod display;
mod image;
mod load_state;
mod variant;

pub use display::{DisplayAttributes, LoadingHint, aspect_ratio_style};
pub use image::{ImageRequest, Quality, SlotId};
pub use load_state::LoadState;
pub use variant::{ImageFormat, Variant, VariantCandidateList};
