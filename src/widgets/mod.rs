use super::*;

pub(crate) mod autocomplete;
pub(crate) mod back_link;
pub(crate) mod history;
