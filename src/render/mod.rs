pub(crate) mod composite;
pub(crate) mod legend;
pub(crate) mod overlay;
pub(crate) mod raster;
pub(crate) mod text;
