pub(crate) mod config;
pub(crate) mod floor;
pub(crate) mod marker;
