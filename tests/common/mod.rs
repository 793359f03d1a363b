//! Shared fixtures for integration tests

use dishpatch_server::CurrentUser;
use dishpatch_server::db::DbService;
use dishpatch_server::db::models::{
    Address, MenuItem, MenuItemCreate, Restaurant, RestaurantCreate, Role, UserCreate,
};
use dishpatch_server::db::repository::{
    MenuItemRepository, RestaurantRepository, UserRepository,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub struct TestEnv {
    pub db: Surreal<Db>,
    pub users: UserRepository,
    pub restaurants: RestaurantRepository,
    pub menu_items: MenuItemRepository,
}

pub async fn env() -> TestEnv {
    let db = DbService::new_in_memory().await.expect("in-memory db").db;
    TestEnv {
        users: UserRepository::new(db.clone()),
        restaurants: RestaurantRepository::new(db.clone()),
        menu_items: MenuItemRepository::new(db.clone()),
        db,
    }
}

pub fn address() -> Address {
    Address {
        street: "12 Flinders Ln".into(),
        city: "Melbourne".into(),
        state: "VIC".into(),
        zip_code: "3000".into(),
        country: "Australia".into(),
    }
}

pub async fn seed_user(env: &TestEnv, name: &str, email: &str, role: Role) -> CurrentUser {
    let user = env
        .users
        .create(UserCreate {
            name: name.into(),
            email: email.into(),
            password: "password-123".into(),
            role,
            phone: None,
            address: None,
        })
        .await
        .expect("seed user");
    CurrentUser {
        id: user.id.expect("user id").to_string(),
        name: user.name,
        role: user.role,
    }
}

pub async fn seed_restaurant(env: &TestEnv, owner: &CurrentUser, name: &str) -> Restaurant {
    env.restaurants
        .create(
            &owner.id,
            RestaurantCreate {
                name: name.into(),
                description: Some("Test kitchen".into()),
                address: address(),
                cuisine_types: vec!["fusion".into()],
                contact_phone: Some("0400000000".into()),
                contact_email: Some("kitchen@example.com".into()),
                image_url: None,
            },
        )
        .await
        .expect("seed restaurant")
}

pub async fn seed_menu_item(
    env: &TestEnv,
    restaurant: &Restaurant,
    name: &str,
    price: &str,
) -> MenuItem {
    env.menu_items
        .create(
            &restaurant.id.clone().expect("restaurant id").to_string(),
            MenuItemCreate {
                name: name.into(),
                description: None,
                price: Decimal::from_str(price).expect("price"),
                category: "mains".into(),
                image_url: None,
                is_available: Some(true),
            },
        )
        .await
        .expect("seed menu item")
}
