pub(crate) mod builtins;
pub(crate) mod compile;
