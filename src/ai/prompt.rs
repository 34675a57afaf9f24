//! Prompt construction for the text-generation model
//!
//! Pure string formatting: a detailed itinerary prompt with a fixed section
//! layout, and a JSON-extraction prompt for free-text input. Numeric fields
//! are formatted with two decimal places; dates are passed through as given.

use crate::models::TravelRequest;

#[derive(Debug, Default, Clone)]
pub struct PromptBuilder;

impl PromptBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the itinerary-generation prompt for a structured request
    #[must_use]
    pub fn itinerary_prompt(&self, request: &TravelRequest) -> String {
        let preferences = request.preferences_text();
        format!(
            "你是一个专业的旅行规划专家。请为以下旅行需求制定一份详细、实用的旅行计划。\n\n\
             === 旅行基本信息 ===\n\
             📍 目的地：{destination}\n\
             📅 旅行时间：{start} 至 {end}\n\
             💰 总预算：{budget:.2}元\n\
             👥 旅行人数：{travelers}人\n\
             ❤️ 旅行偏好：{preferences}\n\n\
             === 请按照以下格式提供旅行计划 ===\n\
             \n\
             🌍 旅行概览\n\
             • 目的地特色介绍\n\
             • 最佳旅行季节说明\n\
             • 行程天数安排\n\
             \n\
             🗓️ 每日详细行程安排\n\
             请按天详细规划，每天包含：\n\
             🏨 住宿建议（具体区域和酒店类型）\n\
             🚗 交通安排（机场接送、市内交通）\n\
             🏛️ 景点游览（具体景点、游览时间）\n\
             🍽️ 餐饮推荐（早中晚餐具体推荐）\n\
             🛍️ 购物建议（特色商品、购物地点）\n\
             \n\
             💰 详细预算分配\n\
             请按以下类别详细分配预算：\n\
             • 交通费用（往返机票、市内交通）\n\
             • 住宿费用（酒店价格范围）\n\
             • 餐饮费用（每日餐饮预算）\n\
             • 景点门票\n\
             • 购物娱乐\n\
             • 应急备用金\n\
             \n\
             📝 实用贴士\n\
             • 当地天气和着装建议\n\
             • 必备物品清单\n\
             • 文化习俗注意事项\n\
             • 安全提示\n\
             • 紧急联系方式\n\
             \n\
             💡 个性化建议\n\
             根据旅行偏好 '{preferences}' 提供特色推荐\n\
             \n\
             请确保：\n\
             1. 行程安排合理，不过于紧凑\n\
             2. 预算分配符合实际情况\n\
             3. 提供具体的地点和时间建议\n\
             4. 考虑交通便利性和时间效率\n\
             5. 用中文回复，内容详实具体\n\
             6. 使用emoji让内容更生动\n\
             7. 总字数在1500字左右\n",
            destination = request.destination,
            start = request.start_date,
            end = request.end_date,
            budget = request.budget,
            travelers = request.traveler_count,
            preferences = preferences,
        )
    }

    /// Build the structured-field extraction prompt for free-text input.
    ///
    /// The field names in the prompt match `ParsedVoiceInfo` exactly, so a
    /// well-behaved model reply deserializes without further mapping.
    #[must_use]
    pub fn extraction_prompt(&self, voice_text: &str) -> String {
        format!(
            "请从以下用户的语音输入中精确解析出旅行需求信息，并严格按照JSON格式返回。\n\n\
             用户语音输入：{voice_text}\n\n\
             需要解析的字段：\n\
             {{\n\
             \x20 \"destination\": \"目的地，如'日本东京'，如果没有明确目的地则返回'未知'\",\n\
             \x20 \"startDate\": \"开始日期，格式YYYY-MM-DD，如果没有明确日期则返回今天之后第7天的日期\",\n\
             \x20 \"endDate\": \"结束日期，格式YYYY-MM-DD，如果没有明确日期则返回开始日期后5天的日期\",\n\
             \x20 \"budget\": \"总预算数字，如果没有明确预算则根据目的地估算\",\n\
             \x20 \"travelerCount\": \"旅行人数，默认2人\",\n\
             \x20 \"preferences\": [\"旅行偏好数组，如'美食'、'文化'、'购物'等\"],\n\
             \x20 \"travelType\": \"旅行类型，如'家庭游'、'情侣游'、'朋友游'等\",\n\
             \x20 \"specialRequirements\": \"特殊需求\"\n\
             }}\n\n\
             请直接返回JSON对象，不要有任何其他文字说明。",
        )
    }
}
