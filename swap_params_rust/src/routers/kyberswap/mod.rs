pub mod kyberswap;
pub mod requests;
pub mod responses;
