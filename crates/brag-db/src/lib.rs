//! # brag-db
//!
//! Store layer implementing the repository traits of `brag-core`.
//!
//! ## Overview
//!
//! Two adapters are provided:
//!
//! - PostgreSQL via SQLx: connection pool, embedded schema, row models,
//!   mappers, and one repository per trait
//! - [`MemoryStore`]: an in-process store with the same semantics, used by
//!   tests and single-process deployments
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brag_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use brag_db::repositories::PgReactionRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::default();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let reactions = PgReactionRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAdminActionRepository, PgCommentRepository, PgLeaderboardRepository, PgMemberRepository,
    PgNotificationRepository, PgReactionRepository, PgReportRepository, PgShoutOutRepository,
};
