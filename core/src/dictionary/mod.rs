//! Tag dictionary and value helpers
//!
//! Tags are always addressed through an explicit name table: a keyword
//! resolves to `(tag, VR)` or is rejected with [`DcmTagsError::UnknownTag`].
//!
//! [`DcmTagsError::UnknownTag`]: crate::error::DcmTagsError::UnknownTag

pub mod tags;
pub mod values;

pub use tags::*;
pub use values::{
    get_non_empty_string, get_string_value, literal_to_primitive, render_value, trim_padding,
    truncate_value, DISPLAY_LIMIT,
};
