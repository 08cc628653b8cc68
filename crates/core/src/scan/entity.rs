use crate::analysis::entity::Opportunity;
use crate::analysis::error::AnalysisError;
use crate::common::Symbol;

/// # Summary
/// 单个标的流水线 (Fetch → Augment → Evaluate) 的最终结果。
///
/// # Invariants
/// - 编排器只观察这一结果，不会看到任何跨任务传播的错误。
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    // 达到阈值，产出机会
    Opportunity(Opportunity),
    // 数据与计算均正常，但未达到阈值
    NoSignal,
    // 数据不可用
    NoData(String),
    // 指标或评估计算失败
    ComputeError(String),
}

impl From<AnalysisError> for SymbolOutcome {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::NoData(reason) => SymbolOutcome::NoData(reason),
            AnalysisError::Compute(reason) => SymbolOutcome::ComputeError(reason),
        }
    }
}

impl From<Result<Option<Opportunity>, AnalysisError>> for SymbolOutcome {
    fn from(result: Result<Option<Opportunity>, AnalysisError>) -> Self {
        match result {
            Ok(Some(opportunity)) => SymbolOutcome::Opportunity(opportunity),
            Ok(None) => SymbolOutcome::NoSignal,
            Err(err) => err.into(),
        }
    }
}

/// # Summary
/// 一次扫描的汇总：排序后的机会列表与各类结果计数。
///
/// # Invariants
/// - `opportunities` 按 `score` 降序，同分保持任务完成顺序。
/// - `scanned == opportunities.len() + no_signal + no_data + compute_errors`。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub opportunities: Vec<Opportunity>,
    pub scanned: usize,
    pub no_signal: usize,
    pub no_data: usize,
    pub compute_errors: usize,
    // 数据不可用或计算失败的标的
    pub failed: Vec<Symbol>,
}

impl ScanReport {
    /// # Summary
    /// 记录一个标的的结果。
    ///
    /// # Logic
    /// 1. 累加扫描计数。
    /// 2. 机会追加到列表末尾（即完成顺序），其余结果只计数。
    pub fn record(&mut self, symbol: Symbol, outcome: SymbolOutcome) {
        self.scanned += 1;
        match outcome {
            SymbolOutcome::Opportunity(opportunity) => self.opportunities.push(opportunity),
            SymbolOutcome::NoSignal => self.no_signal += 1,
            SymbolOutcome::NoData(_) => {
                self.no_data += 1;
                self.failed.push(symbol);
            }
            SymbolOutcome::ComputeError(_) => {
                self.compute_errors += 1;
                self.failed.push(symbol);
            }
        }
    }

    /// 记录一个异常终止的任务（无法得知其标的），计为计算失败
    pub fn record_aborted(&mut self) {
        self.scanned += 1;
        self.compute_errors += 1;
    }

    /// # Summary
    /// 按分数降序排列机会（稳定排序，同分保持发现顺序）。
    pub fn rank(&mut self) {
        self.opportunities.sort_by(|a, b| b.score.cmp(&a.score));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn opportunity(symbol: &str, score: i32) -> Opportunity {
        Opportunity {
            symbol: Symbol::normalize(symbol).unwrap(),
            signals: Vec::new(),
            score,
            current_price: Decimal::ONE,
            rsi: Decimal::ONE,
            volume_ratio: Decimal::ONE,
            trend_20d: Decimal::ZERO,
        }
    }

    #[test]
    fn test_rank_is_stable_for_equal_scores() {
        let mut report = ScanReport::default();
        for (symbol, score) in [("AAA", 2), ("BBB", 5), ("CCC", 2), ("DDD", 3)] {
            let sym = Symbol::normalize(symbol).unwrap();
            report.record(sym, SymbolOutcome::Opportunity(opportunity(symbol, score)));
        }
        report.rank();

        let order: Vec<&str> = report
            .opportunities
            .iter()
            .map(|o| o.symbol.as_str())
            .collect();
        assert_eq!(order, vec!["BBB", "DDD", "AAA", "CCC"]);
    }

    #[test]
    fn test_record_counts_each_outcome() {
        let mut report = ScanReport::default();
        let sym = |s: &str| Symbol::normalize(s).unwrap();
        report.record(sym("AAA"), SymbolOutcome::NoSignal);
        report.record(sym("BBB"), AnalysisError::NoData("empty".into()).into());
        report.record(sym("CCC"), AnalysisError::Compute("nan".into()).into());
        report.record(sym("DDD"), SymbolOutcome::Opportunity(opportunity("DDD", 4)));

        assert_eq!(report.scanned, 4);
        assert_eq!(report.no_signal, 1);
        assert_eq!(report.no_data, 1);
        assert_eq!(report.compute_errors, 1);
        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(report.failed, vec![sym("BBB"), sym("CCC")]);
    }
}
