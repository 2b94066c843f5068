//! Database models
//!
//! One module per collection. Reference fields are serialized as
//! "table:id" strings (see [`serde_helpers`]) so API payloads and
//! stored documents share one shape.

pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
pub mod serde_helpers;
pub mod settlement;
pub mod user;
pub mod wholesale;

pub use cart::CartLine;
pub use order::{Order, OrderItem, OrderStatus, OrderType, PaymentStatus};
pub use payment::{Payment, PaymentState};
pub use product::{Product, Variant};
pub use settlement::{SettlementStatus, SupplierSettlement};
pub use user::{SupplierStatus, User};
pub use wholesale::{CaseItem, Pallet, PalletLine, Wholesale, WholesaleKind};
