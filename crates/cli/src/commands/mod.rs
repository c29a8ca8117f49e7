pub mod evaluate;
pub mod generate;
pub mod init;
pub mod run;
