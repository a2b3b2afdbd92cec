//! HTTP request handlers.

pub(crate) mod all;
pub(crate) mod goto;
pub(crate) mod landing;
pub(crate) mod pages;
