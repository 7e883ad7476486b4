// Transaction assembly

pub mod legacy;
pub mod builders;

// Re-export main types
pub use legacy::{Signature, Transaction};
pub use builders::TxBuilder;
