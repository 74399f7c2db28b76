pub(crate) mod kind;
pub(crate) mod remote;
