pub mod games;
pub mod session;
pub mod users;
