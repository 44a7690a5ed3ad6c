//! Domain models
//!
//! One module per entity. Each module carries the entity struct, its
//! create/update payloads, and any status enum it owns.

pub mod commission;
pub mod customer;
pub mod dispatch;
pub mod return_order;
pub mod settlement;

pub use commission::{
    Commission, CommissionReview, CommissionStatus, CommissionWithNames, ReviewAction,
};
pub use customer::{Customer, CustomerUpsert};
pub use dispatch::{
    CustomerOrderInput, DispatchCreate, DispatchDetail, DispatchOrder, DispatchStatus,
    DispatchWithNames,
};
pub use return_order::{ReturnOrder, ReturnRequest, ReturnStatus};
pub use settlement::{SettleRequest, Settlement, SettlementStatus};
