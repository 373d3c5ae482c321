pub mod attendance;
pub mod company;
pub mod employee;
pub mod role;
pub mod shift;
