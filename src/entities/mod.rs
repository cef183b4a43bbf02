//! sea-orm entities backing [`SqlDemandStore`](crate::store::SqlDemandStore).

pub mod inventory_level;
pub mod item;
pub mod order_line;
