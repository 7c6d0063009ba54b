pub mod currency;
pub mod interest;
