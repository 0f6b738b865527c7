pub mod fee;
pub mod intent;
pub mod route;
pub mod swap;
