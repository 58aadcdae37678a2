pub mod errors;
pub mod inventory;
pub mod traits;
pub mod types;

// Public API exports
pub use errors::{InventoryError, ProviderError};
pub use inventory::{Inventory, InventoryProvider, ProviderCall};
pub use traits::NetworkProvider;
pub use types::{
    ACCEPTER_VPC_FILTER, DescribeQuery, Filter, REQUESTER_VPC_FILTER, RawResource, Tag,
    VPC_ID_FILTER,
};
