//! Static profilers for stylesheet and markup text.
//!
//! - [`css`] - breakpoints, media queries, relative units and flexible layouts
//! - [`html`] - viewport declaration and responsive images

pub mod css;
pub mod html;

pub use css::{average_css_score, css_score, CssOptions, CssProfiler, COMMON_BREAKPOINTS};
pub use html::{html_score, HtmlProfiler};
