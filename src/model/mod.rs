pub mod attendance;
pub mod location;
pub mod profile;
pub mod role;
pub mod visitor;
