pub mod address;
pub mod fee;
pub mod price;
pub mod swap;
pub mod token;
pub mod v3_pool;

pub use address::{FACTORY_ADDRESS, POOL_INIT_CODE_HASH, compute_pool_address};
