//! Object storage for uploaded field images.

pub mod blob;
