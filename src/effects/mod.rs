pub(crate) mod blur;
pub(crate) mod color_correct;
pub(crate) mod composite;
pub(crate) mod fit;
pub(crate) mod mask;
