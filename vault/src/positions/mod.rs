pub mod deposit;
pub mod leverage;
pub mod pool;
pub mod withdraw;
