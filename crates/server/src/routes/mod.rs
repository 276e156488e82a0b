pub mod recommend;
pub mod system;
