//! 产品管理处理器
//!
//! 每个用户操作对应一个处理器：发起一次 REST 调用，响应返回后同步更新 [`Page`]。
//! 页面锁只在响应返回后短暂持有，不会跨越 await，多个请求可以同时在途，
//! 表格以最后返回的响应为准。

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::model::{Product, ProductPayload};
use super::service::ProductApi;
use super::state::{FormField, Page};
use crate::core::config::UiConfig;
use crate::core::error::{ApiError, ClientError, Operation, Result};

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this product?";
pub const CREATED_MESSAGE: &str = "Product created successfully!";
pub const UPDATED_MESSAGE: &str = "Product updated successfully!";
pub const DELETED_MESSAGE: &str = "Product deleted successfully!";

/// 删除前的交互确认
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// 不询问，直接确认
pub struct AlwaysConfirm;

#[async_trait]
impl Confirm for AlwaysConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// 页面事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PageLoaded,
    ShowAll,
    Search,
    Submit,
    Cancel,
    /// 表格容器上的点击，携带按钮的 `data-action` 和所在行的 `data-id`
    TableClick { action: String, row_id: String },
}

/// 由行属性解析出的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(i64),
    Delete(i64),
}

impl RowAction {
    /// 无法识别的按钮或没有 id 的行返回 `None`
    pub fn from_click(action: &str, row_id: &str) -> Option<Self> {
        let id = row_id.trim().parse().ok()?;
        match action {
            "edit" => Some(RowAction::Edit(id)),
            "delete" => Some(RowAction::Delete(id)),
            _ => None,
        }
    }
}

fn lock_page(page: &Mutex<Page>) -> MutexGuard<'_, Page> {
    page.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone)]
pub struct AdminClient {
    api: Arc<dyn ProductApi>,
    confirm: Arc<dyn Confirm>,
    page: Arc<Mutex<Page>>,
    ui: UiConfig,
}

impl AdminClient {
    pub fn new(api: Arc<dyn ProductApi>, confirm: Arc<dyn Confirm>, ui: UiConfig) -> Self {
        Self {
            api,
            confirm,
            page: Arc::new(Mutex::new(Page::new())),
            ui,
        }
    }

    /// 当前页面状态的快照
    pub fn snapshot(&self) -> Page {
        lock_page(&self.page).clone()
    }

    pub fn with_page<R>(&self, f: impl FnOnce(&mut Page) -> R) -> R {
        f(&mut lock_page(&self.page))
    }

    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        lock_page(&self.page).form.set(field, value);
    }

    pub fn set_search_input(&self, value: impl Into<String>) {
        lock_page(&self.page).search_input = value.into();
    }

    /// 单一入口的事件分发；错误已经显示在横幅上，这里只记录日志
    pub async fn dispatch(&self, event: UiEvent) {
        let result = match event {
            UiEvent::PageLoaded | UiEvent::ShowAll => self.load_products().await,
            UiEvent::Search => self.search().await,
            UiEvent::Submit => self.submit().await,
            UiEvent::Cancel => {
                self.reset_form();
                Ok(())
            }
            UiEvent::TableClick { action, row_id } => match RowAction::from_click(&action, &row_id) {
                Some(RowAction::Edit(id)) => self.edit_product(id).await,
                Some(RowAction::Delete(id)) => self.delete_product(id).await,
                None => {
                    debug!("忽略表格点击: action={} row_id={}", action, row_id);
                    Ok(())
                }
            },
        };

        if let Err(err) = result {
            debug!("事件处理失败: {}", err);
        }
    }

    /// 加载全部产品
    pub async fn load_products(&self) -> Result<()> {
        self.begin_listing();
        let result = self.api.list().await;
        self.finish_listing(Operation::LoadProducts, result)
    }

    /// 按名称搜索；空白关键字等同于加载全部
    pub async fn search(&self) -> Result<()> {
        let term = lock_page(&self.page).search_input.trim().to_string();
        if term.is_empty() {
            return self.load_products().await;
        }

        self.begin_listing();
        let result = self.api.search(&term).await;
        self.finish_listing(Operation::SearchProducts, result)
    }

    /// 提交表单：有 id 时更新，否则创建
    pub async fn submit(&self) -> Result<()> {
        let prepared = {
            let page = lock_page(&self.page);
            page.form
                .target_id()
                .and_then(|id| page.form.to_payload().map(|payload| (id, payload)))
        };
        let (target, payload): (Option<i64>, ProductPayload) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => return Err(self.fail(ClientError::form(Operation::SaveProduct, err))),
        };

        let result = match target {
            Some(id) => self.api.update(id, &payload).await,
            None => self.api.create(&payload).await,
        };

        if let Err(err) = result {
            return Err(self.fail(ClientError::api(Operation::SaveProduct, err)));
        }

        let message = match target {
            Some(id) => {
                info!("产品 {} 已更新", id);
                UPDATED_MESSAGE
            }
            None => {
                info!("产品 {} 已创建", payload.name);
                CREATED_MESSAGE
            }
        };
        {
            let mut page = lock_page(&self.page);
            self.show_success(&mut page, message);
            page.form.reset();
        }

        // 刷新失败已在横幅上提示，不影响本次保存的结果
        let _ = self.load_products().await;
        Ok(())
    }

    /// 进入编辑模式
    pub async fn edit_product(&self, id: i64) -> Result<()> {
        match self.api.get(id).await {
            Ok(product) => {
                let mut page = lock_page(&self.page);
                page.form.enter_edit_mode(&product);
                page.scroll_to_form = true;
                debug!("编辑产品 {}", id);
                Ok(())
            }
            Err(err) => Err(self.fail(ClientError::api(Operation::LoadProduct, err))),
        }
    }

    /// 确认后删除
    pub async fn delete_product(&self, id: i64) -> Result<()> {
        if !self.confirm.confirm(DELETE_CONFIRMATION).await {
            debug!("取消删除产品 {}", id);
            return Ok(());
        }

        if let Err(err) = self.api.delete(id).await {
            return Err(self.fail(ClientError::api(Operation::DeleteProduct, err)));
        }

        info!("产品 {} 已删除", id);
        {
            let mut page = lock_page(&self.page);
            self.show_success(&mut page, DELETED_MESSAGE);
        }
        let _ = self.load_products().await;
        Ok(())
    }

    /// 取消编辑，回到添加模式
    pub fn reset_form(&self) {
        lock_page(&self.page).form.reset();
    }

    fn begin_listing(&self) {
        let mut page = lock_page(&self.page);
        page.loading = true;
        page.hide_error();
    }

    fn finish_listing(
        &self,
        operation: Operation,
        result: std::result::Result<Vec<Product>, ApiError>,
    ) -> Result<()> {
        let mut page = lock_page(&self.page);
        page.loading = false;
        match result {
            Ok(products) => {
                info!("渲染 {} 个产品", products.len());
                page.render_products(&products);
                Ok(())
            }
            Err(err) => {
                let err = ClientError::api(operation, err);
                self.show_error(&mut page, err.to_string());
                Err(err)
            }
        }
    }

    fn fail(&self, err: ClientError) -> ClientError {
        let mut page = lock_page(&self.page);
        self.show_error(&mut page, err.to_string());
        err
    }

    fn show_error(&self, page: &mut Page, message: String) {
        warn!("{}", message);
        let generation = page.show_error(message);
        let shared = Arc::clone(&self.page);
        let delay = self.ui.error_banner_duration();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lock_page(&shared).expire_error(generation);
        });
    }

    fn show_success(&self, page: &mut Page, message: &str) {
        let id = page.push_success(message);
        let shared = Arc::clone(&self.page);
        let delay = self.ui.success_banner_duration();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lock_page(&shared).remove_success(id);
        });
    }
}
