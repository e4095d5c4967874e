use thiserror::Error;

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum TrimmerError {
    #[error("注册表错误: {0}")]
    Registry(String),

    #[error("文件系统错误: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("规则文件解析错误: {0}")]
    Parse(String),

    #[error("输入文件为空: {0}")]
    EmptyInput(String),

    #[error("变量无法解析: {0}")]
    Variable(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("其他错误: {0}")]
    Other(String),
}

impl serde::Serialize for TrimmerError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
