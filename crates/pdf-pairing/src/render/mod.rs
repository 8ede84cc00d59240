//! PDF rendering for paired pages
//!
//! This module handles all PDF-specific operations:
//! - Reading page geometry
//! - Creating XObjects from source pages
//! - Building the composed output page

mod page;
mod xobject;

pub use page::{PagePlacement, compose_page, new_blank_canvas};
pub use xobject::{PageMetrics, create_page_xobject, first_page_id, page_metrics};
