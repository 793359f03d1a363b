//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Role, User, UserContact, UserCreate, UserUpdate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "users";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = parse_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM users WHERE email = $email LIMIT 1")
            .bind(("email", email))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Contact listing for all users holding a role
    pub async fn find_contacts_by_role(&self, role: Role) -> RepoResult<Vec<UserContact>> {
        let mut result = self
            .base
            .db()
            .query("SELECT id, name, email, phone FROM users WHERE role = $role ORDER BY name")
            .bind(("role", role))
            .await?;
        let contacts: Vec<UserContact> = result.take(0)?;
        Ok(contacts)
    }

    /// Register a new user; the plaintext password is hashed here
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let email = data.email.to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        let password = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        let now = Utc::now();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE users SET
                    name = $name,
                    email = $email,
                    password = $password,
                    role = $role,
                    phone = $phone,
                    address = $address,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", email))
            .bind(("password", password))
            .bind(("role", data.role))
            .bind(("phone", data.phone))
            .bind(("address", data.address))
            .bind(("now", now))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update profile fields; the role is never touched here
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let rid = parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        if let Some(ref new_email) = data.email {
            let new_email = new_email.to_lowercase();
            if new_email != existing.email && self.find_by_email(&new_email).await?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "User with email '{}' already exists",
                    new_email
                )));
            }
        }

        let mut set_parts = vec!["updated_at = $now"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.email.is_some() {
            set_parts.push("email = $email");
        }
        if data.password.is_some() {
            set_parts.push("password = $password");
        }
        if data.phone.is_some() {
            set_parts.push("phone = $phone");
        }
        if data.address.is_some() {
            set_parts.push("address = $address");
        }

        let query_str = format!("UPDATE $rid SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("rid", rid))
            .bind(("now", Utc::now()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.email {
            query = query.bind(("email", v.to_lowercase()));
        }
        if let Some(v) = data.password {
            let hashed = User::hash_password(&v)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;
            query = query.bind(("password", hashed));
        }
        if let Some(v) = data.phone {
            query = query.bind(("phone", v));
        }
        if let Some(v) = data.address {
            query = query.bind(("address", v));
        }

        let mut result = query.await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }
}
