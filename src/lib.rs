#![deny(unreachable_pub)]

// Core modules
mod consts;
mod credentials;
mod errors;
mod prelude;
mod req;

// Domain types
pub mod types;

// Feature modules
pub mod auth;
pub mod menu;
pub mod orders;
pub mod voucher;
pub mod ws;

// Re-exports
pub use auth::AuthenticationService;
pub use consts::{BaseUrl, LOCAL_API_URL};
pub use credentials::Credentials;
pub use errors::Error;
pub use menu::{MenuCache, MenuService, ProductCatalog};
pub use orders::{OrderApi, OrderService, OrderStore};
pub use req::HttpClient;
pub use types::{
    OrderSession, OrderedProduct, OrderedProductStatus, Product, ProductCategory, SessionStatus,
    SessionUpdate,
};
pub use voucher::{QrVoucherRenderer, VoucherRenderer};
pub use ws::{OrderEvent, OrderFeed, OrderSocket, OutgoingMessage};
