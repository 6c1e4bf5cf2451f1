pub mod cli;
pub mod sdk_gateways;
