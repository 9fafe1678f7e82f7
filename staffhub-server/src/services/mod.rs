//! HTTP 服务装配

pub mod https;

pub use https::build_app;
