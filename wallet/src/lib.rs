pub mod approvals;
pub mod auth;
pub mod config;
pub mod ledger_api;
pub mod state;
pub mod store;
pub mod wallet;

pub use wallet::GalleryWallet;
