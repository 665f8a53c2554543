//! Geode Navigation
//!
//! Browsing is a position within a linear stack of pages:
//! - Navigating appends after the current page, discarding any forward pages
//! - Back and forward move the position without refetching
//! - The stack can be trimmed below or above the current page, or emptied
//!
//! Also home to gemtext parsing, link extraction and input resolution,
//! which the stack and the shell both build on.

mod error;
mod gemtext;
mod input;
mod page;
mod stack;

pub use error::NavigationError;
pub use gemtext::{parse_gemtext, Line};
pub use input::{is_gemini_link, resolve_input, resolve_link};
pub use page::{extract_links, Link, Page, GEMTEXT_MIME};
pub use stack::NavigationState;

pub type Result<T> = std::result::Result<T, NavigationError>;
