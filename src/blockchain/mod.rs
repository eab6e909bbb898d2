pub mod client;
pub mod etherscan;
pub mod ethplorer;
