use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 编程语言（函数骨架接口只接受这几种）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Python,
    Java,
    Cpp,
    Go,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Javascript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::Go,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Go => "go",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Python
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "不支持的语言: {}（可选: javascript, python, java, cpp, go）",
                    s
                )
            })
    }
}
