pub mod balance_service;
pub mod category_service;
pub mod export_service;
pub mod filter_service;
pub mod history_service;
