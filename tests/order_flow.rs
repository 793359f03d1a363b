//! Order lifecycle integration tests
//!
//! Exercises the full placement-to-delivery path and the concurrency and
//! authorization edges around it, over an in-memory database.

mod common;

use common::{env, seed_menu_item, seed_restaurant, seed_user};
use dishpatch_server::AppError;
use dishpatch_server::db::models::{
    AssignDelivery, OrderCreate, OrderItemRequest, OrderStatus, OrderStatusUpdate, PaymentMethod,
    PaymentStatus, Role,
};
use dishpatch_server::db::repository::{OrderRepository, StatusWrite};
use dishpatch_server::orders::OrderManager;
use rust_decimal::Decimal;
use std::str::FromStr;

fn order_request(
    restaurant_id: &str,
    items: Vec<OrderItemRequest>,
    payment: PaymentMethod,
) -> OrderCreate {
    OrderCreate {
        restaurant_id: restaurant_id.into(),
        items,
        delivery_address: common::address(),
        payment_method: payment,
        order_notes: None,
        delivery_instructions: None,
    }
}

#[tokio::test]
async fn full_delivery_flow() {
    let env = env().await;
    let manager = OrderManager::new(env.db.clone());

    let customer = seed_user(&env, "Casey", "casey@example.com", Role::Customer).await;
    let owner = seed_user(&env, "Olive", "olive@example.com", Role::RestaurantOwner).await;
    let courier = seed_user(&env, "Dana", "dana@example.com", Role::DeliveryPersonnel).await;

    let restaurant = seed_restaurant(&env, &owner, "Flame Grill").await;
    let restaurant_id = restaurant.id.clone().unwrap().to_string();
    let burger = seed_menu_item(&env, &restaurant, "Burger", "10.00").await;
    let fries = seed_menu_item(&env, &restaurant, "Fries", "5.00").await;

    // Customer places a card order: 2 burgers + 1 fries = 25.00, paid upfront
    let order = manager
        .create_order(
            &customer,
            order_request(
                &restaurant_id,
                vec![
                    OrderItemRequest {
                        menu_item_id: burger.id.clone().unwrap().to_string(),
                        quantity: 2,
                    },
                    OrderItemRequest {
                        menu_item_id: fries.id.clone().unwrap().to_string(),
                        quantity: 1,
                    },
                ],
                PaymentMethod::Card,
            ),
        )
        .await
        .unwrap();
    let order_id = order.id.clone().unwrap().to_string();
    assert_eq!(order.total_price, Decimal::from_str("25.00").unwrap());
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Paid);

    // Owner confirms, prepares, marks ready
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::ReadyForPickup,
    ] {
        let updated = manager
            .update_status(
                &owner,
                &order_id,
                OrderStatusUpdate {
                    status,
                    delivery_personnel_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    // Unassigned ready order shows up in the courier's queue
    let queue = manager.delivery_queue(&courier).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id.clone().unwrap().to_string(), order_id);

    // Owner assigns the courier
    let assigned = manager
        .assign_delivery(
            &owner,
            &order_id,
            AssignDelivery {
                delivery_personnel_id: courier.id.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        assigned.delivery_personnel.clone().unwrap().to_string(),
        courier.id
    );

    // Courier takes it out and delivers it
    let out = manager
        .update_status(
            &courier,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::OutForDelivery,
                delivery_personnel_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(out.status, OrderStatus::OutForDelivery);
    assert!(out.actual_delivery_time.is_none());

    let delivered = manager
        .update_status(
            &courier,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::Delivered,
                delivery_personnel_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.actual_delivery_time.is_some());
    assert_eq!(delivered.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn status_endpoint_is_role_and_relation_gated() {
    let env = env().await;
    let manager = OrderManager::new(env.db.clone());

    let customer = seed_user(&env, "Casey", "c1@example.com", Role::Customer).await;
    let owner = seed_user(&env, "Olive", "o1@example.com", Role::RestaurantOwner).await;
    let other_owner = seed_user(&env, "Oscar", "o2@example.com", Role::RestaurantOwner).await;
    let courier = seed_user(&env, "Dana", "d1@example.com", Role::DeliveryPersonnel).await;

    let restaurant = seed_restaurant(&env, &owner, "Gate Check").await;
    let restaurant_id = restaurant.id.clone().unwrap().to_string();
    let dish = seed_menu_item(&env, &restaurant, "Dish", "12.00").await;

    let order = manager
        .create_order(
            &customer,
            order_request(
                &restaurant_id,
                vec![OrderItemRequest {
                    menu_item_id: dish.id.clone().unwrap().to_string(),
                    quantity: 1,
                }],
                PaymentMethod::CashOnDelivery,
            ),
        )
        .await
        .unwrap();
    let order_id = order.id.clone().unwrap().to_string();

    // Customers never use the status endpoint
    let denied = manager
        .update_status(
            &customer,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::Cancelled,
                delivery_personnel_id: None,
            },
        )
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    // An owner of a different restaurant is rejected
    let denied = manager
        .update_status(
            &other_owner,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::Confirmed,
                delivery_personnel_id: None,
            },
        )
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    // An unassigned courier cannot move the order
    let denied = manager
        .update_status(
            &courier,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::OutForDelivery,
                delivery_personnel_id: None,
            },
        )
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    // The owning owner cannot jump into courier statuses
    let denied = manager
        .update_status(
            &owner,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::Delivered,
                delivery_personnel_id: None,
            },
        )
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn owner_rejection_refunds_paid_orders() {
    let env = env().await;
    let manager = OrderManager::new(env.db.clone());

    let customer = seed_user(&env, "Casey", "c2@example.com", Role::Customer).await;
    let owner = seed_user(&env, "Olive", "o3@example.com", Role::RestaurantOwner).await;
    let restaurant = seed_restaurant(&env, &owner, "Refund Corner").await;
    let restaurant_id = restaurant.id.clone().unwrap().to_string();
    let dish = seed_menu_item(&env, &restaurant, "Dish", "18.00").await;

    let order = manager
        .create_order(
            &customer,
            order_request(
                &restaurant_id,
                vec![OrderItemRequest {
                    menu_item_id: dish.id.clone().unwrap().to_string(),
                    quantity: 1,
                }],
                PaymentMethod::Card,
            ),
        )
        .await
        .unwrap();
    let order_id = order.id.clone().unwrap().to_string();

    let rejected = manager
        .update_status(
            &owner,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::Rejected,
                delivery_personnel_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    assert_eq!(rejected.payment_status, PaymentStatus::Refunded);
}

#[tokio::test]
async fn customer_cancel_window_and_refund() {
    let env = env().await;
    let manager = OrderManager::new(env.db.clone());

    let customer = seed_user(&env, "Casey", "c3@example.com", Role::Customer).await;
    let stranger = seed_user(&env, "Sam", "s1@example.com", Role::Customer).await;
    let owner = seed_user(&env, "Olive", "o4@example.com", Role::RestaurantOwner).await;
    let restaurant = seed_restaurant(&env, &owner, "Cancel Point").await;
    let restaurant_id = restaurant.id.clone().unwrap().to_string();
    let dish = seed_menu_item(&env, &restaurant, "Dish", "9.00").await;

    let request = order_request(
        &restaurant_id,
        vec![OrderItemRequest {
            menu_item_id: dish.id.clone().unwrap().to_string(),
            quantity: 1,
        }],
        PaymentMethod::Card,
    );

    // Cancel while pending refunds the card payment
    let order = manager.create_order(&customer, request.clone()).await.unwrap();
    let order_id = order.id.clone().unwrap().to_string();

    let denied = manager.cancel(&stranger, &order_id).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let cancelled = manager.cancel(&customer, &order_id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);

    // Once preparing, cancellation is no longer meaningful
    let order = manager.create_order(&customer, request).await.unwrap();
    let order_id = order.id.clone().unwrap().to_string();
    for status in [OrderStatus::Confirmed, OrderStatus::Preparing] {
        manager
            .update_status(
                &owner,
                &order_id,
                OrderStatusUpdate {
                    status,
                    delivery_personnel_id: None,
                },
            )
            .await
            .unwrap();
    }
    let denied = manager.cancel(&customer, &order_id).await;
    assert!(matches!(denied, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn cash_orders_are_refunded_on_cancel_and_reject() {
    let env = env().await;
    let manager = OrderManager::new(env.db.clone());

    let customer = seed_user(&env, "Casey", "c7@example.com", Role::Customer).await;
    let owner = seed_user(&env, "Olive", "o8@example.com", Role::RestaurantOwner).await;
    let restaurant = seed_restaurant(&env, &owner, "Cash Counter").await;
    let restaurant_id = restaurant.id.clone().unwrap().to_string();
    let dish = seed_menu_item(&env, &restaurant, "Dish", "14.00").await;

    let request = order_request(
        &restaurant_id,
        vec![OrderItemRequest {
            menu_item_id: dish.id.clone().unwrap().to_string(),
            quantity: 1,
        }],
        PaymentMethod::CashOnDelivery,
    );

    // Nothing was charged yet, but cancellation still marks the payment refunded
    let order = manager.create_order(&customer, request.clone()).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    let order_id = order.id.clone().unwrap().to_string();

    let cancelled = manager.cancel(&customer, &order_id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);

    // Same on rejection by the owner
    let order = manager.create_order(&customer, request).await.unwrap();
    let order_id = order.id.clone().unwrap().to_string();

    let rejected = manager
        .update_status(
            &owner,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::Rejected,
                delivery_personnel_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    assert_eq!(rejected.payment_status, PaymentStatus::Refunded);
}

#[tokio::test]
async fn stale_status_write_is_a_conflict() {
    let env = env().await;
    let manager = OrderManager::new(env.db.clone());
    let repo = OrderRepository::new(env.db.clone());

    let customer = seed_user(&env, "Casey", "c4@example.com", Role::Customer).await;
    let owner = seed_user(&env, "Olive", "o5@example.com", Role::RestaurantOwner).await;
    let restaurant = seed_restaurant(&env, &owner, "Race Cafe").await;
    let restaurant_id = restaurant.id.clone().unwrap().to_string();
    let dish = seed_menu_item(&env, &restaurant, "Dish", "11.00").await;

    let order = manager
        .create_order(
            &customer,
            order_request(
                &restaurant_id,
                vec![OrderItemRequest {
                    menu_item_id: dish.id.clone().unwrap().to_string(),
                    quantity: 1,
                }],
                PaymentMethod::Card,
            ),
        )
        .await
        .unwrap();
    let order_id = order.id.clone().unwrap().to_string();

    // Another actor moves the order after our read
    manager
        .update_status(
            &owner,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::Confirmed,
                delivery_personnel_id: None,
            },
        )
        .await
        .unwrap();

    // A write still expecting `pending` loses the race and touches nothing
    let stale = repo
        .update_status_checked(
            &order_id,
            OrderStatus::Pending,
            OrderStatus::Rejected,
            StatusWrite::default(),
        )
        .await
        .unwrap();
    assert!(stale.is_none());

    let current = repo.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn delivery_queue_is_oldest_first_and_scoped() {
    let env = env().await;
    let manager = OrderManager::new(env.db.clone());

    let customer = seed_user(&env, "Casey", "c5@example.com", Role::Customer).await;
    let owner = seed_user(&env, "Olive", "o6@example.com", Role::RestaurantOwner).await;
    let courier = seed_user(&env, "Dana", "d2@example.com", Role::DeliveryPersonnel).await;
    let rival = seed_user(&env, "Remy", "r1@example.com", Role::DeliveryPersonnel).await;

    let restaurant = seed_restaurant(&env, &owner, "Queue Kitchen").await;
    let restaurant_id = restaurant.id.clone().unwrap().to_string();
    let dish = seed_menu_item(&env, &restaurant, "Dish", "7.00").await;

    let mut order_ids = Vec::new();
    for _ in 0..3 {
        let order = manager
            .create_order(
                &customer,
                order_request(
                    &restaurant_id,
                    vec![OrderItemRequest {
                        menu_item_id: dish.id.clone().unwrap().to_string(),
                        quantity: 1,
                    }],
                    PaymentMethod::Card,
                ),
            )
            .await
            .unwrap();
        let id = order.id.clone().unwrap().to_string();
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::ReadyForPickup,
        ] {
            manager
                .update_status(
                    &owner,
                    &id,
                    OrderStatusUpdate {
                        status,
                        delivery_personnel_id: None,
                    },
                )
                .await
                .unwrap();
        }
        order_ids.push(id);
    }

    // Assign the middle order to the rival courier; it leaves Dana's queue
    manager
        .assign_delivery(
            &owner,
            &order_ids[1],
            AssignDelivery {
                delivery_personnel_id: rival.id.clone(),
            },
        )
        .await
        .unwrap();

    let queue = manager.delivery_queue(&courier).await.unwrap();
    let queue_ids: Vec<String> = queue
        .iter()
        .map(|o| o.id.clone().unwrap().to_string())
        .collect();
    assert_eq!(queue_ids, vec![order_ids[0].clone(), order_ids[2].clone()]);

    // The rival sees their assignment plus the unassigned orders, oldest first
    let rival_queue = manager.delivery_queue(&rival).await.unwrap();
    let rival_ids: Vec<String> = rival_queue
        .iter()
        .map(|o| o.id.clone().unwrap().to_string())
        .collect();
    assert_eq!(rival_ids, order_ids);
}

#[tokio::test]
async fn assignment_requires_a_delivery_role() {
    let env = env().await;
    let manager = OrderManager::new(env.db.clone());

    let customer = seed_user(&env, "Casey", "c6@example.com", Role::Customer).await;
    let owner = seed_user(&env, "Olive", "o7@example.com", Role::RestaurantOwner).await;
    let restaurant = seed_restaurant(&env, &owner, "Assign House").await;
    let restaurant_id = restaurant.id.clone().unwrap().to_string();
    let dish = seed_menu_item(&env, &restaurant, "Dish", "6.00").await;

    let order = manager
        .create_order(
            &customer,
            order_request(
                &restaurant_id,
                vec![OrderItemRequest {
                    menu_item_id: dish.id.clone().unwrap().to_string(),
                    quantity: 1,
                }],
                PaymentMethod::Card,
            ),
        )
        .await
        .unwrap();
    let order_id = order.id.clone().unwrap().to_string();

    // Pending orders are not assignable, and customers are not couriers
    let result = manager
        .assign_delivery(
            &owner,
            &order_id,
            AssignDelivery {
                delivery_personnel_id: customer.id.clone(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    manager
        .update_status(
            &owner,
            &order_id,
            OrderStatusUpdate {
                status: OrderStatus::Confirmed,
                delivery_personnel_id: None,
            },
        )
        .await
        .unwrap();

    // Confirmed, but the assignee still has the wrong role
    let result = manager
        .assign_delivery(
            &owner,
            &order_id,
            AssignDelivery {
                delivery_personnel_id: customer.id.clone(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}
