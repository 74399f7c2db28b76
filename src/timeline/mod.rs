pub(crate) mod model;
pub(crate) mod query;
pub(crate) mod state;
