pub mod error;
pub mod memory;
pub mod order_repo;
pub mod store;
pub mod user_repo;

pub use error::{RepoError, RepoResult};
pub use memory::MemoryStore;
pub use order_repo::PgOrderRepo;
pub use store::{NewOrder, NewUser, Order, OrderChanges, OrderRepo, User, UserChanges, UserRepo};
pub use user_repo::PgUserRepo;
