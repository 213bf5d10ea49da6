pub mod charge_client;
pub mod memory_repo;

pub use charge_client::HttpChargeService;
pub use memory_repo::InMemoryOrderRepository;
