pub mod dispatcher;
pub mod engine;
pub mod tab_alert;
