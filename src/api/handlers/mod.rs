pub mod booking;
pub mod coach;
pub mod health;
pub mod learner;
pub mod lesson;
pub mod schedule;
pub mod template;
