pub mod pool;
pub mod position;
pub mod token;

// Re-export for easier access
pub use pool::FarmPool;
pub use position::{LockPosition, StakingPosition};
pub use token::TokenInfo;
