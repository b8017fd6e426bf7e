//! Database models

mod notification;
mod order;
mod product;
mod user;

pub use notification::{Notification, NotificationCreate};
pub use order::{AddressDraft, Customer, Order, OrderDraft, OrderItemDraft, OrderListQuery};
pub use product::{Product, ProductBulkUpdate, ProductCreate, ProductListQuery, ProductStatus, ProductUpdate};
pub use user::{User, UserCreate, UserResponse, UserUpdate};
