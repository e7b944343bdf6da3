//! 页面状态
//!
//! 表单、表格、加载指示和横幅都集中在 [`Page`] 里，由处理器在响应返回后同步修改。

use validator::Validate;

use super::model::{Product, ProductPayload};
use super::view::{render_rows, TableRow};
use crate::core::error::FormError;

pub const ADD_TITLE: &str = "Add New Product";
pub const EDIT_TITLE: &str = "Edit Product";
pub const ADD_BUTTON: &str = "Add Product";
pub const UPDATE_BUTTON: &str = "Update Product";

/// 表单模式，完全由隐藏的 id 字段决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// 可由用户编辑的表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    Price,
    Quantity,
}

impl std::str::FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FormField::Name),
            "description" => Ok(FormField::Description),
            "price" => Ok(FormField::Price),
            "quantity" => Ok(FormField::Quantity),
            other => Err(format!("unknown field: {}", other)),
        }
    }
}

/// 产品表单，字段都保存为输入框里的原始字符串
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    /// 隐藏的 id 字段
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub title: String,
    pub submit_label: String,
    pub cancel_visible: bool,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            price: String::new(),
            quantity: String::new(),
            title: ADD_TITLE.to_string(),
            submit_label: ADD_BUTTON.to_string(),
            cancel_visible: false,
        }
    }
}

impl ProductForm {
    pub fn mode(&self) -> FormMode {
        if self.id.trim().is_empty() {
            FormMode::Add
        } else {
            FormMode::Edit
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Description => self.description = value,
            FormField::Price => self.price = value,
            FormField::Quantity => self.quantity = value,
        }
    }

    /// 回到空白的添加状态
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 用后端返回的产品填充表单并切换到编辑状态
    pub fn enter_edit_mode(&mut self, product: &Product) {
        self.id = product.id.map(|id| id.to_string()).unwrap_or_default();
        self.name = product.name.clone();
        self.description = product.description.clone().unwrap_or_default();
        self.price = product.price.to_string();
        self.quantity = product.quantity.to_string();
        self.title = EDIT_TITLE.to_string();
        self.submit_label = UPDATE_BUTTON.to_string();
        self.cancel_visible = true;
    }

    /// 编辑目标；添加模式下为 `None`
    pub fn target_id(&self) -> Result<Option<i64>, FormError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        id.parse()
            .map(Some)
            .map_err(|_| FormError::InvalidNumber("id"))
    }

    /// 按输入框的原生约束构造请求体
    pub fn to_payload(&self) -> Result<ProductPayload, FormError> {
        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidNumber("price"))?;
        if !price.is_finite() {
            return Err(FormError::InvalidNumber("price"));
        }
        let quantity: i32 = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidNumber("quantity"))?;

        let payload = ProductPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            price,
            quantity,
        };

        payload.validate().map_err(|errors| {
            let mut messages: Vec<String> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{} is invalid", field),
                    })
                })
                .collect();
            messages.sort();
            FormError::Constraint(messages.join(", "))
        })?;

        Ok(payload)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ErrorBanner {
    message: String,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct SuccessBanner {
    id: u64,
    message: String,
}

/// 页面整体状态
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub form: ProductForm,
    pub search_input: String,
    pub table: Vec<TableRow>,
    pub loading: bool,
    /// 进入编辑模式后需要把视口滚动到表单
    pub scroll_to_form: bool,
    error: Option<ErrorBanner>,
    error_generation: u64,
    success: Vec<SuccessBanner>,
    next_success_id: u64,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用最新响应替换整张表
    pub fn render_products(&mut self, products: &[Product]) {
        self.table = render_rows(products);
    }

    /// 显示错误横幅，返回本次显示的代号，定时隐藏时用它判断是否已被新消息覆盖
    pub fn show_error(&mut self, message: impl Into<String>) -> u64 {
        self.error_generation += 1;
        self.error = Some(ErrorBanner {
            message: message.into(),
            generation: self.error_generation,
        });
        self.error_generation
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    /// 只有当前显示的仍是 `generation` 那一条时才隐藏
    pub fn expire_error(&mut self, generation: u64) {
        if self.error.as_ref().map(|e| e.generation) == Some(generation) {
            self.error = None;
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// 新的成功横幅插在最前面
    pub fn push_success(&mut self, message: impl Into<String>) -> u64 {
        self.next_success_id += 1;
        self.success.insert(
            0,
            SuccessBanner {
                id: self.next_success_id,
                message: message.into(),
            },
        );
        self.next_success_id
    }

    pub fn remove_success(&mut self, id: u64) {
        self.success.retain(|b| b.id != id);
    }

    pub fn success_messages(&self) -> Vec<&str> {
        self.success.iter().map(|b| b.message.as_str()).collect()
    }

    /// 取出并清除滚动请求
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ProductForm {
        let mut form = ProductForm::default();
        form.set(FormField::Name, "Widget");
        form.set(FormField::Description, "");
        form.set(FormField::Price, "9.5");
        form.set(FormField::Quantity, "3");
        form
    }

    #[test]
    fn test_default_form_is_add_mode() {
        let form = ProductForm::default();
        assert_eq!(form.mode(), FormMode::Add);
        assert_eq!(form.title, ADD_TITLE);
        assert_eq!(form.submit_label, ADD_BUTTON);
        assert!(!form.cancel_visible);
        assert_eq!(form.target_id().unwrap(), None);
    }

    #[test]
    fn test_enter_edit_mode_populates_fields() {
        let mut form = ProductForm::default();
        form.enter_edit_mode(&Product {
            id: Some(7),
            name: "Widget".to_string(),
            description: None,
            price: 9.5,
            quantity: 3,
        });

        assert_eq!(form.id, "7");
        assert_eq!(form.name, "Widget");
        assert_eq!(form.description, "");
        assert_eq!(form.price, "9.5");
        assert_eq!(form.quantity, "3");
        assert_eq!(form.title, EDIT_TITLE);
        assert_eq!(form.submit_label, UPDATE_BUTTON);
        assert!(form.cancel_visible);
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.target_id().unwrap(), Some(7));

        form.reset();
        assert_eq!(form, ProductForm::default());
    }

    #[test]
    fn test_to_payload_parses_numbers() {
        let payload = filled_form().to_payload().unwrap();
        assert_eq!(payload.name, "Widget");
        assert_eq!(payload.description, "");
        assert_eq!(payload.price, 9.5);
        assert_eq!(payload.quantity, 3);
    }

    #[test]
    fn test_to_payload_rejects_constraint_violations() {
        let mut form = filled_form();
        form.set(FormField::Price, "abc");
        assert_eq!(form.to_payload(), Err(FormError::InvalidNumber("price")));

        let mut form = filled_form();
        form.set(FormField::Quantity, "2.5");
        assert_eq!(form.to_payload(), Err(FormError::InvalidNumber("quantity")));

        let mut form = filled_form();
        form.set(FormField::Quantity, "-1");
        assert_eq!(
            form.to_payload(),
            Err(FormError::Constraint("quantity must not be negative".to_string()))
        );

        let mut form = filled_form();
        form.set(FormField::Name, "");
        assert_eq!(
            form.to_payload(),
            Err(FormError::Constraint("name is required".to_string()))
        );
    }

    #[test]
    fn test_error_banner_generations() {
        let mut page = Page::new();
        let first = page.show_error("first");
        let second = page.show_error("second");

        page.expire_error(first);
        assert_eq!(page.error_message(), Some("second"));

        page.expire_error(second);
        assert_eq!(page.error_message(), None);
    }

    #[test]
    fn test_success_banners_stack_newest_first() {
        let mut page = Page::new();
        let a = page.push_success("created");
        page.push_success("deleted");
        assert_eq!(page.success_messages(), ["deleted", "created"]);

        page.remove_success(a);
        assert_eq!(page.success_messages(), ["deleted"]);
    }
}
