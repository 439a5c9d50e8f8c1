//! Pure computation engine(s): deltas, trade classification, FIFO accounting.

pub mod classifier;
pub mod deltas;
pub mod fifo;
pub mod holders;

pub use classifier::TradeClassifier;
pub use deltas::{extract_deltas, LAMPORT_DECIMALS};
pub use fifo::{FifoAccountant, Lot, Realization, WalletPnl};
pub use holders::HolderCollector;
