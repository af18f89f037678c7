// Adapters layer: concrete implementations for external systems (places http service, local files).

pub mod places;
pub mod storage;
