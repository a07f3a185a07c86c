pub mod blend;
pub mod reconcile;
