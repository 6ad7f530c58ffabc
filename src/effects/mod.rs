//! Pure pixel-region effects.
//!
//! Every function here takes the source buffer by reference and returns a
//! new buffer; the input is never modified. Region arguments go through
//! [`clip_to_bounds`](crate::geometry::clip_to_bounds), so a region lying
//! entirely outside the buffer yields an unmodified copy.

mod blur;
mod draw;
mod fill;
mod mosaic;
mod resize;

pub use blur::{apply_blur, gaussian_blur};
pub use draw::{draw_arrow, draw_path};
pub use fill::apply_fill;
pub use mosaic::apply_mosaic;
pub use resize::{resize, resize_buffer};
