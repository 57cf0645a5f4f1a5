//! 业务逻辑服务模块
//!
//! 封装行情获取、数据装配、解读生成与响应格式化逻辑

pub mod formatter;          // 响应格式化
pub mod narrative_service;  // AI 解读生成
pub mod stock;              // 行情数据源（实时 / Mock）与区间表现计算
pub mod stock_service;      // 重试与降级装配流程
