//! HTTP API
//!
//! - `/api/*`：创建、列表、删除、重置点击数
//! - `/health*`：健康检查
//! - `/{code}`：重定向（必须最后注册）

pub mod constants;
pub mod cors;
pub mod services;

pub use cors::build_cors_middleware;
pub use services::{configure_routes, json_config};
