//! 产品管理：模型、REST 服务、页面状态、渲染和处理器

pub mod handler;
pub mod model;
pub mod service;
pub mod state;
pub mod view;

pub use handler::{AdminClient, AlwaysConfirm, Confirm, RowAction, UiEvent};
pub use model::{Product, ProductPayload};
pub use service::{HttpProductService, ProductApi};
pub use state::{FormField, FormMode, Page, ProductForm};
