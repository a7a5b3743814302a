pub mod build;
pub mod init;
pub mod pm;
pub mod serve;
pub mod toc;
