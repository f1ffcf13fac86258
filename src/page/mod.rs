#[allow(clippy::module_inception)]
mod page;

pub(crate) use page::Page;
