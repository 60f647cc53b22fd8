pub mod attendance;
pub mod location;
pub mod profile;
pub mod scan;
pub mod visitor;
