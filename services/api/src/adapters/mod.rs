pub mod db;
pub mod notify;

pub use db::PgStore;
pub use notify::WebhookNotifier;
