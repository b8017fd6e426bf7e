//! Domain models shared by the storefront and the panel server.

mod address;
mod enums;
mod line_item;
mod role;

pub use address::Address;
pub use enums::{
    NotificationPriority, NotificationStatus, NotificationType, OrderStatus, PaymentMethod,
    PaymentStatus, SendType,
};
pub use line_item::LineItem;
pub use role::Role;
