pub mod backup_exchange;
pub mod catalog;
pub mod core;
pub mod equipment;
pub mod schedule;
pub mod session;
pub mod timetable;
