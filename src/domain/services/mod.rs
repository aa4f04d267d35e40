pub mod booking_service;
pub mod calendar;
pub mod rules;
pub mod schedule_service;
pub mod scheduler;
