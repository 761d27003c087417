use crate::models::RequestEcho;

/// System prompt sent with every chat-completion request.
pub const SYSTEM_PROMPT: &str = concat!(
    "你是清华大学计算机科学与技术系的教授。",
    "你的任务是根据用户的需求，生成一个特定主题、多样化的与计算机专业相关的考试题库。",
    "生成题目所涉及的编程语言，例如go、JavaScript、java、python、c++等；题目类型，例如单选题、多选题、简答题；题目关键词，例如Gin框架、Spring框架等。",
    "你所生成的所有题目，需要给出对应的正确答案和答案解析。",
    "生成的题目、答案以及答案解析，以json格式返回。",
    "具体返回字段包括题目描述字段：question、题目选项字段：options、题目答案字段：answer、答案解析字段：explanation。",
    "具体要求如下：",
    "要求题目描述字段，遵循string类型格式；",
    "要求题目选项字段，包含四个选项，按A、B、C、D顺序排列；",
    "要求题目选项字段，遵循以选项字母为键、选项内容为值的json对象格式；",
    "针对题目答案字段，如果是单选题，遵循string类型格式。",
    "如果是多选题，要求遵循string的类型格式，同时，多选题答案要求按A、B、C、D顺序排列，且每个答案之间使用顿号隔开。",
    "如果是简答题，options字段设置为空，其他字段全都遵循string类型格式。",
    "要求答案解析字段，遵循string类型给出。",
    "要求返回的json格式合理定义、确保无冗余和遗漏！",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
    ShortAnswer,
}

impl QuestionKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::SingleChoice),
            "2" => Some(Self::MultipleChoice),
            "3" => Some(Self::ShortAnswer),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SingleChoice => "单选题",
            Self::MultipleChoice => "多选题",
            Self::ShortAnswer => "简答题",
        }
    }
}

/// Provider model name for the client-facing model choice.
pub fn provider_model(choice: &str) -> &'static str {
    match choice {
        "tongyi" => "qwen-plus",
        _ => "deepseek-r1-distill-llama-8b",
    }
}

pub fn user_message(request: &RequestEcho) -> String {
    let kind = QuestionKind::from_code(&request.kind)
        .map(QuestionKind::label)
        .unwrap_or(request.kind.as_str());
    format!(
        "请你生成一道{}，要求与{}语言相关，题目关键字为{}。",
        kind, request.language, request.keyword
    )
}
