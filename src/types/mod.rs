mod menu;
mod session;

pub use menu::{
    CategoryUpdate, ImageUpdate, NewCategory, NewProduct, Product, ProductCategory, ProductUpdate,
};
pub use session::{
    OrderSession, OrderedProduct, OrderedProductStatus, SessionStatus, SessionUpdate,
};
