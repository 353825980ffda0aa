pub(crate) mod demo;
pub(crate) mod lookup;
pub(crate) mod records;
