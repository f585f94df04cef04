mod service;
mod state;
mod store;

pub use service::{OrderApi, OrderService};
pub use state::OrdersState;
pub use store::OrderStore;
