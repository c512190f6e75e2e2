pub mod transact;
pub mod worker;
