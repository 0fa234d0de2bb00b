pub mod config;
pub mod decode;
pub mod encode;
pub mod recommend;
pub mod scan;
