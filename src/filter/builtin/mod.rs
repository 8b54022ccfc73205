//! Built-in filters.

mod css_absolute;
mod css_media;
mod minify;

pub use css_absolute::CssAbsolute;
pub use css_media::CssMedia;
pub use minify::{CssMin, JsMin};
