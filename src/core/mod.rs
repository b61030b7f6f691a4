pub mod attendance;
pub mod backup;
pub mod blast;
pub mod config;
pub mod content;
pub mod dashboard;
pub mod draft;
pub mod employee;
pub mod log;
pub mod meeting;
pub mod qr;
pub mod sidak;
pub mod statistics;
