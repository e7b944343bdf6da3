//! 核心错误处理模块

use std::fmt;

use thiserror::Error;

/// 客户端发起的操作，决定错误横幅的前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadProducts,
    SearchProducts,
    LoadProduct,
    SaveProduct,
    DeleteProduct,
}

impl Operation {
    /// 错误横幅前缀
    pub fn error_prefix(&self) -> &'static str {
        match self {
            Operation::LoadProducts => "Error loading products",
            Operation::SearchProducts => "Error searching products",
            Operation::LoadProduct => "Error loading product",
            Operation::SaveProduct => "Error saving product",
            Operation::DeleteProduct => "Error deleting product",
        }
    }

    /// 非 2xx 响应时显示的说明
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::LoadProducts => "Failed to fetch products",
            Operation::SearchProducts => "Failed to search products",
            Operation::LoadProduct => "Failed to fetch product",
            Operation::SaveProduct => "Failed to save product",
            Operation::DeleteProduct => "Failed to delete product",
        }
    }
}

/// 服务层错误：传输失败、非成功状态码、响应体无法解析
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// 表单原生约束校验失败
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
    #[error("{0}")]
    Constraint(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientErrorKind {
    Api(ApiError),
    Form(FormError),
}

/// 处理器级错误，Display 即横幅文本
#[derive(Debug, Clone, PartialEq)]
pub struct ClientError {
    pub operation: Operation,
    pub kind: ClientErrorKind,
}

impl ClientError {
    pub fn api(operation: Operation, err: ApiError) -> Self {
        Self {
            operation,
            kind: ClientErrorKind::Api(err),
        }
    }

    pub fn form(operation: Operation, err: FormError) -> Self {
        Self {
            operation,
            kind: ClientErrorKind::Form(err),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.operation.error_prefix();
        match &self.kind {
            ClientErrorKind::Api(ApiError::Status(_)) => {
                write!(f, "{}: {}", prefix, self.operation.failure_message())
            }
            ClientErrorKind::Api(err) => write!(f, "{}: {}", prefix, err),
            ClientErrorKind::Form(err) => write!(f, "{}: {}", prefix, err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ClientErrorKind::Api(err) => Some(err),
            ClientErrorKind::Form(err) => Some(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
