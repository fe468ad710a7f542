//! Companion server: the upload echo endpoint and its storage seam.

pub mod echo;
pub mod local_storage;
pub mod storage;
