use serde::{Deserialize, Serialize};

/// 只渲染这种类型的文件
pub const PNG_MIME_TYPE: &str = "image/png";

/// Drive 中文件夹的 MIME 类型
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// 存储后端中的文件夹 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(pub String);

impl FolderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 文件夹下的一个条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
}

impl ImageEntry {
    pub fn is_png(&self) -> bool {
        self.mime_type == PNG_MIME_TYPE
    }
}

/// 一张已下载的图表图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub file_id: String,
    /// 图片标题（即文件名）
    pub caption: String,
    pub bytes: Vec<u8>,
}

impl ChartImage {
    /// 字节是否以 PNG 文件签名开头
    pub fn has_png_signature(&self) -> bool {
        self.bytes.starts_with(&PNG_SIGNATURE)
    }
}

/// 多图表对中的哪一侧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSide {
    /// `anchor_{id}`
    Anchor,
    /// `anchor_{id}_0`
    Similar,
}

impl ChartSide {
    pub const BOTH: [ChartSide; 2] = [ChartSide::Anchor, ChartSide::Similar];

    /// 从 1 开始的序号
    pub fn number(self) -> usize {
        match self {
            ChartSide::Anchor => 1,
            ChartSide::Similar => 2,
        }
    }

    /// 该侧对应的文件夹名
    pub fn folder_name(self, chart_id: &str) -> String {
        match self {
            ChartSide::Anchor => format!("anchor_{}", chart_id),
            ChartSide::Similar => format!("anchor_{}_0", chart_id),
        }
    }
}

impl std::fmt::Display for ChartSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Chart {}", self.number())
    }
}
