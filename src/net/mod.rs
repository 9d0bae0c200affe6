pub mod fetch;
pub mod poller;
