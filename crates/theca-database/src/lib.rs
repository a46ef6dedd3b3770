//! # theca-database
//!
//! PostgreSQL connection management, migrations, and the [`UserStore`]
//! implementations used by the service layer.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use sqlx::PgPool;

pub use repositories::memory::MemoryUserRepository;
pub use repositories::user::PgUserRepository;
pub use store::UserStore;
