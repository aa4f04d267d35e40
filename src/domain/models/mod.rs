pub mod booking;
pub mod coach;
pub mod learner;
pub mod lesson;
pub mod review;
pub mod template;
