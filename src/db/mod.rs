pub mod attendance;
pub mod blast;
pub mod content;
pub mod employees;
pub mod initialize;
pub mod log;
pub mod meetings;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod sidak;
pub mod statistics;
pub mod stats;
