pub mod container;
pub mod edit;
pub mod node;
pub mod outline;
pub mod segment;
pub mod store;
