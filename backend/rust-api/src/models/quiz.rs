use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

pub const DEFAULT_MODEL: &str = "tongyi";
pub const DEFAULT_LANGUAGE: &str = "go";
pub const DEFAULT_KIND: &str = "1";
pub const DEFAULT_KEYWORD: &str = "任意关键字";

pub const SUPPORTED_LANGUAGES: [&str; 5] = ["java", "go", "python", "c++", "javascript"];
pub const SUPPORTED_KINDS: [&str; 3] = ["1", "2", "3"];
pub const SUPPORTED_MODELS: [&str; 2] = ["tongyi", "deepseek"];

const LANGUAGE_MESSAGE: &str = "请输入正确的编程语言(java/go/python/c++/javascript)";
const KIND_MESSAGE: &str = "请输入正确的题目类型(1：单选题/2：多选题/3：简答题)";
const MODEL_MESSAGE: &str = "请输入正确的模型(tongyi/deepseek)";

/// Body of `POST /index`. Every field is optional; an empty string counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

impl QuizRequest {
    /// Fills defaults for every absent or empty field.
    pub fn normalized(&self) -> RequestEcho {
        RequestEcho {
            model: or_default(&self.model, DEFAULT_MODEL),
            language: or_default(&self.language, DEFAULT_LANGUAGE),
            kind: or_default(&self.kind, DEFAULT_KIND),
            keyword: or_default(&self.keyword, DEFAULT_KEYWORD),
        }
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl Validate for QuizRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let checks: [(&'static str, &Option<String>, fn(&str) -> Result<(), ValidationError>); 3] = [
            ("language", &self.language, validate_language),
            ("type", &self.kind, validate_kind),
            ("model", &self.model, validate_model),
        ];
        for (field, value, check) in checks {
            if let Some(value) = value.as_deref() {
                if let Err(err) = check(value) {
                    errors.add(field, err);
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_model(value: &str) -> Result<(), ValidationError> {
    check_member(value, &SUPPORTED_MODELS, "model", MODEL_MESSAGE)
}

fn validate_language(value: &str) -> Result<(), ValidationError> {
    check_member(value, &SUPPORTED_LANGUAGES, "language", LANGUAGE_MESSAGE)
}

fn validate_kind(value: &str) -> Result<(), ValidationError> {
    check_member(value, &SUPPORTED_KINDS, "type", KIND_MESSAGE)
}

fn check_member(
    value: &str,
    allowed: &[&str],
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() || allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(code).with_message(Cow::Borrowed(message)))
    }
}

/// Picks the message to show the client. Language is reported first, then
/// question type, then model.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["language", "type", "model"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "请求参数错误".to_string())
}

/// The normalized request as it is stored next to each generated question.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestEcho {
    pub model: String,
    pub language: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub keyword: String,
}

/// One generated question. `options` holds `"<label>: <text>"` lines sorted by label
/// and is empty for short-answer questions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizRecord {
    pub question: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

// Older log files store an empty option list as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response body for the question endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizResponse {
    pub code: i32,
    pub msg: String,
    #[serde(rename = "aiRes")]
    pub ai_res: QuizRecord,
}

impl QuizResponse {
    pub fn success(record: QuizRecord) -> Self {
        Self {
            code: 0,
            msg: String::new(),
            ai_res: record,
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            code: -1,
            msg: msg.into(),
            ai_res: QuizRecord::default(),
        }
    }
}
