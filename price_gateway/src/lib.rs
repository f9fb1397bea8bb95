// Price gateway 库入口
// 导出所有需要在测试中使用的模块

pub mod api_error;
pub mod api_types;
pub mod config;
pub mod consts;
pub mod gateway;
pub mod handlers;
pub mod init;
pub mod model;
pub mod provider;
pub mod server;
pub mod singleflight;
pub mod store;
