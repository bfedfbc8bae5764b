//! 请求级中间件

mod context;

pub use context::request_context;
