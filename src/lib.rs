pub mod config;
pub mod conversation;
pub mod errors;
pub mod extraction;
pub mod init;
pub mod interview;
pub mod llm;
pub mod nexus_config;
pub mod question;
pub mod stream;
pub mod ui;
