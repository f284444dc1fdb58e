//!
//! Localised text for the interactive frontend
//!

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::drive::error::SolveError;
use crate::geometry::error::GeometryError;

///
/// A display language of the frontend.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Chinese,
    English,
    Russian,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Chinese, Language::English, Language::Russian];

    ///
    /// Picks a language from the number shown on the language menu.
    ///
    /// # Parameters:
    /// - `choice`: The user's input, "1", "2" or "3"
    ///
    pub fn from_menu_choice(choice: &str) -> Option<Language> {
        match choice.trim() {
            "1" => Some(Language::Chinese),
            "2" => Some(Language::English),
            "3" => Some(Language::Russian),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Language::Chinese => 0,
            Language::English => 1,
            Language::Russian => 2,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "cn" | "chinese" => Ok(Language::Chinese),
            "en" | "english" => Ok(Language::English),
            "ru" | "russian" => Ok(Language::Russian),
            other => Err(format!("unknown language `{}`, expected zh, en or ru", other)),
        }
    }
}

///
/// Every piece of text the frontend shows.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    MenuTitle,
    MenuForward,
    MenuDistance,
    MenuCircumference,
    MenuPrompt,
    PromptC1,
    PromptC2,
    PromptDistance,
    PromptLength,
    PromptKnownC,
    PromptUnknownWheel,
    ResultLength,
    ResultDistance,
    ResultCircumference,
    WrapAngle,
    InvalidOption,
    InvalidNumber,
    ErrorPrefix,
    Infeasible,
    NotConverged,
    BestEffort,
    PreviewSaved,
}

/// Language selection, shown before a language is known.
pub const LANGUAGE_MENU: [&str; 3] = [
    "1.-------中文 (Chinese)-----",
    "2.-------English-----------",
    "3.-------Русский (Russian)-",
];
pub const LANGUAGE_PROMPT: &str = "请选择语言 (please select language):";
pub const LANGUAGE_INVALID: &str = "无效的选项(Invalid option)";
pub const CONTINUE_PROMPT: &str = "是否继续？continue?(y/n)";

/// Text per message, in `Language::index` order.
static MESSAGES: Lazy<HashMap<Message, [&'static str; 3]>> = Lazy::new(|| {
    use Message::*;

    HashMap::from([
        (MenuTitle, [
            "选择需要输入的参数:",
            "Please select the parameters to input:",
            "Выберите параметры для ввода:",
        ]),
        (MenuForward, [
            "1.已知传动轮周长 C1, C2, 和传动轮圆心距 D (计算皮带长度 L)",
            "1. Given the wheel circumferences C1, C2 and the center distance D, calculate the belt length L.",
            "1. Зная длины окружностей колёс C1, C2 и расстояние между центрами D, вычислить длину ремня L.",
        ]),
        (MenuDistance, [
            "2.已知传动轮周长 C1, C2, 和传动皮带长度 L (计算圆心距 D)",
            "2. Given the wheel circumferences C1, C2 and the belt length L, calculate the center distance D.",
            "2. Зная длины окружностей колёс C1, C2 и длину ремня L, вычислить расстояние между центрами D.",
        ]),
        (MenuCircumference, [
            "3.已知其中一轮周长 C, 皮带长度 L, 和传动轮圆心距 D (计算另一轮周长)",
            "3. Given the circumference C of one wheel, the belt length L and the center distance D, calculate the circumference of the other wheel.",
            "3. Зная длину окружности одного колеса C, длину ремня L и расстояние между центрами D, вычислить длину окружности другого колеса.",
        ]),
        (MenuPrompt, [
            "请输入选项 (1/2/3): ",
            "Please enter the option (1/2/3): ",
            "Введите вариант (1/2/3): ",
        ]),
        (PromptC1, [
            "请输入传动轮1周长 C1: ",
            "Please enter the circumference of wheel 1, C1: ",
            "Введите длину окружности колеса 1, C1: ",
        ]),
        (PromptC2, [
            "请输入传动轮2周长 C2: ",
            "Please enter the circumference of wheel 2, C2: ",
            "Введите длину окружности колеса 2, C2: ",
        ]),
        (PromptDistance, [
            "请输入圆心距 D: ",
            "Please enter the center distance, D: ",
            "Введите расстояние между центрами, D: ",
        ]),
        (PromptLength, [
            "请输入皮带长度 L: ",
            "Please enter the belt length, L: ",
            "Введите длину ремня, L: ",
        ]),
        (PromptKnownC, [
            "请输入已知轮周长 C: ",
            "Please enter the circumference of the known wheel, C: ",
            "Введите длину окружности известного колеса, C: ",
        ]),
        (PromptUnknownWheel, [
            "未知的是哪个轮 (1/2): ",
            "Which wheel is unknown (1/2): ",
            "Какое колесо неизвестно (1/2): ",
        ]),
        (ResultLength, [
            "皮带长度 L = ",
            "The belt length L = ",
            "Длина ремня L = ",
        ]),
        (ResultDistance, [
            "圆心距 D = ",
            "The center distance D = ",
            "Расстояние между центрами D = ",
        ]),
        (ResultCircumference, [
            "另一轮周长 ",
            "The circumference of the other wheel ",
            "Длина окружности другого колеса ",
        ]),
        (WrapAngle, [
            "带包角",
            "Wrap angle ",
            "Угол обхвата ",
        ]),
        (InvalidOption, [
            "无效的选项。",
            "Invalid option.",
            "Неверный вариант.",
        ]),
        (InvalidNumber, [
            "请输入一个数字。",
            "Please enter a number.",
            "Введите число.",
        ]),
        (ErrorPrefix, [
            "错误：",
            "Error: ",
            "Ошибка: ",
        ]),
        (Infeasible, [
            "圆心距D不能小于两轮半径之差的绝对值。",
            "The center distance D cannot be smaller than the difference of the wheel radii.",
            "Расстояние между центрами D не может быть меньше разности радиусов колёс.",
        ]),
        (NotConverged, [
            "无法收敛，请检查参数合理性。",
            "Could not converge, please check the parameters are reasonable.",
            "Не удалось найти решение, проверьте параметры.",
        ]),
        (BestEffort, [
            "注意：迭代未收敛，结果为近似值。",
            "Note: the iteration did not converge, the result is approximate.",
            "Внимание: итерации не сошлись, результат приблизительный.",
        ]),
        (PreviewSaved, [
            "预览已保存到 ",
            "Preview saved to ",
            "Предпросмотр сохранён в ",
        ]),
    ])
});

///
/// Looks up the text of a message.
///
/// # Parameters:
/// - `language`: The display language
/// - `message`: The message to show
///
/// # Returns:
/// - The localised text, or an empty string if the table has no entry
///
pub fn text(language: Language, message: Message) -> &'static str {
    MESSAGES.get(&message).map(|texts| texts[language.index()]).unwrap_or("")
}

///
/// Describes a solver error in the display language. Errors without a translation fall back to
/// their English `Display` text.
///
/// # Parameters:
/// - `language`: The display language
/// - `err`: The error to describe
///
pub fn describe_error(language: Language, err: &SolveError) -> String {
    let detail = match err {
        SolveError::Geometry(GeometryError::InfeasibleGeometry { .. }) => text(language, Message::Infeasible).to_owned(),
        SolveError::ConvergenceFailure { .. } => text(language, Message::NotConverged).to_owned(),
        other => other.to_string(),
    };

    format!("{}{}", text(language, Message::ErrorPrefix), detail)
}
