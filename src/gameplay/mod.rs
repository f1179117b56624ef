pub mod feedback;
pub mod flight;
pub mod transition;
