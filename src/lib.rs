//! # 产品目录管理客户端
//!
//! 通过 `/api/products` REST 接口列出、搜索、创建、更新和删除产品：
//! - 页面状态集中在 [`Page`] 中，由 [`AdminClient`] 的处理器在响应返回后更新
//! - 表格渲染统一转义产品文本
//! - 行内操作通过 `data-id` 属性统一分发

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::products::{
    AdminClient, AlwaysConfirm, Confirm, FormField, FormMode, HttpProductService, Page, Product,
    ProductApi, ProductPayload, RowAction, UiEvent,
};
pub use crate::core::config::ClientConfig;
pub use crate::core::error::{ApiError, ClientError, FormError, Operation};
