pub mod api;
pub mod core;
pub mod dispatch;
pub mod evaluate;
pub mod gen;
pub mod patterns;
pub mod permute;
pub mod pool;
pub mod random;
pub mod solve;
