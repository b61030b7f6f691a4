pub mod attendance;
pub mod backup;
pub mod blast;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod document;
pub mod draft;
pub mod employee;
pub mod export;
pub mod init;
pub mod log;
pub mod meeting;
pub mod news;
pub mod sidak;
pub mod stats;
