pub(crate) mod orchestrator;
pub(crate) mod output;
pub(crate) mod scene;
pub(crate) mod source;
