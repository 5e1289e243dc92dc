mod blob;
pub mod intset;
pub mod utils;
pub mod ziplist;
pub mod zipmap;
