pub mod controller;
pub mod poller;
