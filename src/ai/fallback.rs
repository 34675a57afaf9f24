//! Deterministic fallback itinerary generation
//!
//! Used whenever the model call reports failure: a five-day templated
//! itinerary interpolating the request fields plus the fixed-ratio budget
//! breakdown. No remote call, same input always gives the same output.

use crate::models::TravelRequest;

use super::budget::recommended_allocation;

/// Number of templated days; each day header names the destination once.
const TEMPLATE_DAYS: u32 = 5;

/// Produce the templated itinerary for a request.
///
/// The caller guarantees `traveler_count >= 1` (see
/// [`TravelRequest::validate`]).
#[must_use]
pub fn mock_itinerary(request: &TravelRequest) -> String {
    let allocation = recommended_allocation(request.budget);
    let per_person = request.budget / f64::from(request.traveler_count.max(1));
    let destination = &request.destination;

    format!(
        "🌍 智能旅行规划\n\n\
         📅 行程概览\n\
         • 旅行时间：{start} 至 {end}（共{days}天）\n\
         • 总预算：¥{budget:.2}元（人均¥{per_person:.2}）\n\
         • 旅行人数：{travelers}人\n\
         • 旅行偏好：{preferences}\n\n\
         🗓️ 每日详细行程安排\n\n\
         第一天：抵达{destination}\n\
         🏨 住宿：市中心酒店，方便出行\n\
         🚗 交通：机场专车接送\n\
         🏛️ 景点：市区地标游览\n\
         🍽️ 餐饮：当地特色餐厅\n\n\
         第二天：{destination}深度探索\n\
         🏨 住宿：同第一天酒店\n\
         🚗 交通：地铁+出租车\n\
         🏛️ 景点：主要景点参观\n\
         🍽️ 餐饮：特色美食体验\n\n\
         第三天：{destination}特色体验\n\
         🏨 住宿：同第一天酒店\n\
         🚗 交通：包车服务\n\
         🏛️ 景点：根据偏好安排活动\n\
         🍽️ 餐饮：网红餐厅打卡\n\n\
         第四天：{destination}自由活动\n\
         🏨 住宿：同第一天酒店\n\
         🚗 交通：自由安排\n\
         🏛️ 景点：购物或休闲\n\
         🍽️ 餐饮：自选美食\n\n\
         第五天：告别{destination}，返程\n\
         🏨 住宿：无（返程）\n\
         🚗 交通：机场送机\n\
         🏛️ 景点：周边最后游览\n\
         🍽️ 餐饮：机场简餐\n\n\
         💰 详细预算分配\n\
         • 交通费用：30% (¥{transportation:.2})\n\
         • 住宿费用：35% (¥{accommodation:.2})\n\
         • 餐饮费用：20% (¥{food:.2})\n\
         • 景点门票：10% (¥{attractions:.2})\n\
         • 购物娱乐：5% (¥{shopping:.2})\n\n\
         📝 实用贴士\n\
         • 建议提前预订机票和酒店\n\
         • 准备当地货币和信用卡\n\
         • 下载当地交通和翻译APP\n\
         • 注意天气变化，准备合适衣物\n\
         • 保持重要证件和财物安全\n\n\
         💡 温馨提示\n\
         此行程为智能生成，请根据实际情况调整。祝您旅途愉快！🎉",
        start = request.start_date,
        end = request.end_date,
        days = TEMPLATE_DAYS,
        budget = request.budget,
        per_person = per_person,
        travelers = request.traveler_count,
        preferences = request.preferences_text(),
        destination = destination,
        transportation = allocation.transportation,
        accommodation = allocation.accommodation,
        food = allocation.food,
        attractions = allocation.attractions,
        shopping = allocation.shopping,
    )
}
