//! Stock postprocessors.
//!
//! Each postprocessor is a small parameter struct implementing
//! [`Postprocessor`](crate::Postprocessor). They are the operations host
//! code most commonly chains with [`compose`](crate::chain::compose):
//!
//! - [`grayscale`] - ITU-R BT.709 luminance conversion
//! - [`blur`] - Gaussian blur
//! - [`brightness`] - exposure adjustment in stops
//! - [`rounded`] - rounded-corner alpha masking
//! - [`resize`] - resampling to fixed dimensions

pub mod blur;
pub mod brightness;
pub mod grayscale;
pub mod resize;
pub mod rounded;

pub use blur::GaussianBlurPostprocessor;
pub use brightness::BrightnessPostprocessor;
pub use grayscale::GrayscalePostprocessor;
pub use resize::{FilterType, ResizePostprocessor};
pub use rounded::RoundedCornersPostprocessor;
