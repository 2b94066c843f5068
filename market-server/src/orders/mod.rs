//! Order assembler and read views
//!
//! Orders are immutable snapshots of what was bought at what price.
//! Status transitions are the only writes after creation; orders are
//! never deleted.

mod assembler;
mod views;
#[cfg(test)]
mod tests;

pub use assembler::{CreateOrderRequest, OrderAssembler, OrderItemInput, UpdateStatusRequest};
pub use views::{SupplierOrderItemView, SupplierOrderView, WholesaleSlice, supplier_view};
