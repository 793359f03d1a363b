//! Data models for the marketplace tables

pub mod serde_helpers;

pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod review;
pub mod user;

pub use menu_item::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate};
pub use order::{
    AssignDelivery, Order, OrderCreate, OrderId, OrderItem, OrderItemRequest, OrderStatus,
    OrderStatusUpdate, PaymentMethod, PaymentStatus,
};
pub use restaurant::{Address, Restaurant, RestaurantCreate, RestaurantId, RestaurantUpdate};
pub use review::{Review, ReviewCreate, ReviewId, ReviewUpdate};
pub use user::{Role, User, UserContact, UserCreate, UserId, UserUpdate};
