pub(crate) mod color;
pub(crate) mod document;
pub(crate) mod error;
