pub mod files;
pub mod identity;
pub mod payhawk;
