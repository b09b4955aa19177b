//! 预设问答
//!
//! 回复按问题原文精确匹配，未命中时返回固定的兜底回复。

use super::MessageCategory;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// 会话开场白
pub const WELCOME_MESSAGE: &str =
    "欢迎使用健康咨询助手！我可以为您提供药物知识、健康咨询等服务。请问有什么可以帮助您的？";

/// 未命中预设问题时的回复
pub const FALLBACK_REPLY: &str =
    "感谢您的提问！我正在整理相关信息，稍后为您提供详细回答。如需更专业的医疗建议，请咨询您的医生。";

/// 预设问题，按界面展示顺序
pub const PREDEFINED_QUESTIONS: [&str; 4] = [
    "如何正确服用感冒药？",
    "高血压患者饮食需要注意什么？",
    "常见抗生素的副作用有哪些？",
    "如何缓解失眠症状？",
];

const DRUG_KEYWORDS: [&str; 3] = ["药", "服用", "副作用"];
const HEALTH_KEYWORDS: [&str; 3] = ["血压", "失眠", "饮食"];

static SCRIPTED_REPLIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            PREDEFINED_QUESTIONS[0],
            "感冒药的正确服用方法取决于具体药物类型。一般来说：\n\n\
             1. 按照说明书或医嘱的剂量和频率服用\n\
             2. 多数感冒药建议饭后服用，以减少对胃的刺激\n\
             3. 不要同时服用多种含有相同成分的感冒药\n\
             4. 服用期间避免饮酒\n\
             5. 如症状持续加重或超过3天未见好转，应及时就医\n\n\
             请问您具体想了解哪种感冒药的服用方法？",
        ),
        (
            PREDEFINED_QUESTIONS[1],
            "高血压患者的饮食调整非常重要，以下是一些建议：\n\n\
             1. 减少钠的摄入：每天盐的摄入量不超过5克\n\
             2. 增加钾的摄入：多吃新鲜蔬菜和水果\n\
             3. 控制脂肪摄入：选择不饱和脂肪，避免反式脂肪\n\
             4. 适量摄入蛋白质：选择鱼类、禽肉等优质蛋白质\n\
             5. 限制饮酒：男性每天不超过2杯，女性不超过1杯\n\
             6. 增加膳食纤维：多吃全谷物、蔬菜和水果\n\n\
             此外，保持健康的体重、规律运动和减少压力也对控制血压有帮助。",
        ),
        (
            PREDEFINED_QUESTIONS[2],
            "抗生素的副作用因药物种类而异，常见的副作用包括：\n\n\
             1. 胃肠道反应：恶心、呕吐、腹泻、腹痛\n\
             2. 过敏反应：皮疹、瘙痒、呼吸困难（严重时）\n\
             3. 肝肾功能损害：长期或大剂量使用可能影响肝肾功能\n\
             4. 菌群失调：可能导致念珠菌感染等二次感染\n\
             5. 神经系统反应：头痛、头晕、失眠等\n\n\
             使用抗生素时应严格遵循医嘱，不要自行增减剂量或停药。如出现严重不适，应立即就医。",
        ),
        (
            PREDEFINED_QUESTIONS[3],
            "缓解失眠可以尝试以下方法：\n\n\
             1. 建立规律的睡眠时间表，每天同一时间上床和起床\n\
             2. 创造良好的睡眠环境：保持卧室安静、黑暗和凉爽\n\
             3. 避免睡前使用电子设备，因为蓝光会抑制褪黑素的产生\n\
             4. 限制咖啡因和酒精的摄入，特别是下午和晚上\n\
             5. 睡前进行放松活动，如阅读、听轻音乐或泡热水澡\n\
             6. 适量运动，但避免在睡前3小时内进行剧烈运动\n\n\
             如果失眠问题持续存在，建议咨询医生以获得专业帮助。",
        ),
    ])
});

/// 查找预设回复，未命中返回兜底回复
pub fn reply_for(question: &str) -> &'static str {
    SCRIPTED_REPLIES
        .get(question.trim())
        .copied()
        .unwrap_or(FALLBACK_REPLY)
}

/// 是否有预设回复
pub fn is_scripted(question: &str) -> bool {
    SCRIPTED_REPLIES.contains_key(question.trim())
}

/// 按关键词判断问题类别，药物优先
pub fn classify(question: &str) -> MessageCategory {
    if DRUG_KEYWORDS.iter().any(|k| question.contains(k)) {
        MessageCategory::Drug
    } else if HEALTH_KEYWORDS.iter().any(|k| question.contains(k)) {
        MessageCategory::Health
    } else {
        MessageCategory::General
    }
}

/// 回复的类别
///
/// 预设问题只分药物和健康两类：含"药"或"服用"为药物，其余为健康。
/// 其他问题按 [`classify`] 的关键词判断。
pub fn reply_category(question: &str) -> MessageCategory {
    if !is_scripted(question) {
        return classify(question);
    }
    if ["药", "服用"].iter().any(|k| question.contains(k)) {
        MessageCategory::Drug
    } else {
        MessageCategory::Health
    }
}
