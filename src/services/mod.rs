pub mod archive;
pub mod convert;
pub mod fs_utils;
pub mod nif;
pub mod search;
pub mod workspace;
