mod gateways;

pub use gateways::*;
