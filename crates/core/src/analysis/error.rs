use thiserror::Error;

/// # Summary
/// 单个标的在流水线某一阶段的失败原因。
///
/// # Invariants
/// - 只在单个标的的任务内部流转，绝不跨越任务边界中断整个扫描。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    // 无可用数据：网络失败、历史不足、缺失字段过多
    #[error("No data: {0}")]
    NoData(String),
    // 计算失败：指标全为空、除零、非有限值
    #[error("Compute error: {0}")]
    Compute(String),
}
