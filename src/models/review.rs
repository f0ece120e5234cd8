//! 评审结果
//!
//! 反馈服务返回的评审 JSON 由大模型生成，字段类型并不稳定：
//! 分数可能是整数、小数或数字字符串，要点可能是字符串或字符串数组。
//! 这里统一宽松解析，再转换成固定结构的 [`Review`]。

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 评审维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCategory {
    Clarification,
    BruteForce,
    Coding,
}

impl ReviewCategory {
    pub const ALL: [ReviewCategory; 3] = [
        ReviewCategory::Clarification,
        ReviewCategory::BruteForce,
        ReviewCategory::Coding,
    ];
}

impl fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReviewCategory::Clarification => "澄清",
            ReviewCategory::BruteForce => "暴力解法",
            ReviewCategory::Coding => "编码",
        })
    }
}

/// 逐行问题
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineIssue {
    pub line: Option<u32>,
    pub issue: String,
    pub suggestion: String,
}

/// 最终评审（整体替换，不做部分更新）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub total_score: f64,
    pub category_scores: BTreeMap<ReviewCategory, f64>,
    pub category_feedback: BTreeMap<ReviewCategory, String>,
    pub line_issues: Vec<LineIssue>,
    pub key_takeaways: Vec<String>,
    pub reference_solution: Option<String>,
}

impl Review {
    pub fn score(&self, category: ReviewCategory) -> f64 {
        self.category_scores.get(&category).copied().unwrap_or(0.0)
    }

    pub fn feedback(&self, category: ReviewCategory) -> &str {
        self.category_feedback
            .get(&category)
            .map(String::as_str)
            .unwrap_or("")
    }
}

// ========== 接口原始结构 ==========

/// `/api/code-review` 的响应体
#[derive(Debug, Clone, Deserialize)]
pub struct CodeReviewResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub review: RawReview,
    #[serde(default)]
    pub actual_solution: Option<String>,
}

impl CodeReviewResponse {
    /// 转换为 [`Review`]，参考答案优先取响应顶层字段
    pub fn into_review(self) -> Review {
        let solution = self.actual_solution.or(self.review.actual_solution.clone());
        self.review.into_review(solution)
    }
}

/// 评审原始 JSON
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub clarification: RawCategory,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brute_force: RawCategory,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coding: RawCoding,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub total: Option<f64>,
    #[serde(default)]
    pub key_pointers: Option<Takeaways>,
    #[serde(default)]
    pub actual_solution: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategory {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub grade: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoding {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub grade: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_by_line: Vec<RawLineItem>,
}

/// 逐行条目：结构化对象，或一句纯文字
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLineItem {
    Entry(RawLineIssue),
    Text(String),
}

impl RawLineItem {
    fn into_issue(self) -> LineIssue {
        match self {
            RawLineItem::Entry(raw) => LineIssue {
                line: raw
                    .line
                    .filter(|n| *n >= 1.0 && *n <= u32::MAX as f64)
                    .map(|n| n as u32),
                issue: raw.issue.unwrap_or_default(),
                suggestion: raw.suggestion.unwrap_or_default(),
            },
            RawLineItem::Text(text) => LineIssue {
                line: None,
                issue: text.trim().to_string(),
                suggestion: String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLineIssue {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub line: Option<f64>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// 要点：一段文字或文字列表
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Takeaways {
    Many(Vec<String>),
    One(String),
}

impl Takeaways {
    fn into_lines(self) -> Vec<String> {
        let raw = match self {
            Takeaways::Many(items) => items,
            Takeaways::One(text) => text.lines().map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|line| {
                line.trim()
                    .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•')
                    .trim()
                    .to_string()
            })
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl RawReview {
    pub fn into_review(self, reference_solution: Option<String>) -> Review {
        let mut category_scores = BTreeMap::new();
        let mut category_feedback = BTreeMap::new();

        let parts = [
            (
                ReviewCategory::Clarification,
                self.clarification.grade,
                self.clarification.feedback,
            ),
            (
                ReviewCategory::BruteForce,
                self.brute_force.grade,
                self.brute_force.feedback,
            ),
            (ReviewCategory::Coding, self.coding.grade, self.coding.feedback),
        ];
        for (category, grade, feedback) in parts {
            category_scores.insert(category, grade.unwrap_or(0.0));
            category_feedback.insert(category, feedback.unwrap_or_default());
        }

        // 缺少总分时按各维度求和
        let total_score = self
            .total
            .unwrap_or_else(|| category_scores.values().sum());

        let line_issues = self
            .coding
            .line_by_line
            .into_iter()
            .map(RawLineItem::into_issue)
            .collect();

        Review {
            total_score,
            category_scores,
            category_feedback,
            line_issues,
            key_takeaways: self
                .key_pointers
                .map(Takeaways::into_lines)
                .unwrap_or_default(),
            reference_solution: reference_solution.filter(|s| !s.trim().is_empty()),
        }
    }
}

// 字段存在但为 null 时按缺省处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// 分数既可能是数字也可能是字符串
fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Visitor;

    struct ScoreVisitor;

    impl<'de> Visitor<'de> for ScoreVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            // "8/10" 这类写法只取分子
            let head = value.split('/').next().unwrap_or("").trim();
            Ok(head.parse::<f64>().ok())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScoreVisitor)
}
