pub mod tick;
pub mod uptime;
