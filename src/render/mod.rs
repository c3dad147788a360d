pub(crate) mod canvas;
pub(crate) mod font;
pub(crate) mod isolate;
pub(crate) mod overlay;
pub(crate) mod photo;
pub(crate) mod text;
