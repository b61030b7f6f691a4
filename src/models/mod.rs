pub mod attendance;
pub mod checklist;
pub mod document;
pub mod employee;
pub mod expiry;
pub mod meeting;
pub mod news;
pub mod shift;
pub mod sidak;
pub mod sidak_kind;
pub mod statistics;
