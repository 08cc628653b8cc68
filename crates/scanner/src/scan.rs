use crate::history::HistoryFetcher;
use crate::indicator::IndicatorEngine;
use crate::signal::SignalEvaluator;
use radar_core::analysis::entity::Opportunity;
use radar_core::analysis::error::AnalysisError;
use radar_core::common::Symbol;
use radar_core::scan::entity::{ScanReport, SymbolOutcome};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// # Summary
/// 单个标的的处理流水线 Fetch → Augment → Evaluate。
struct Pipeline {
    fetcher: HistoryFetcher,
    engine: IndicatorEngine,
    evaluator: SignalEvaluator,
}

impl Pipeline {
    async fn process(&self, symbol: &Symbol) -> Result<Option<Opportunity>, AnalysisError> {
        let series = self.fetcher.fetch(symbol).await?;
        let frame = self.engine.augment(series)?;
        self.evaluator.evaluate(&frame)
    }

    /// # Summary
    /// 执行流水线并把结果折叠为 `SymbolOutcome`，同时记录日志。
    async fn run(&self, symbol: &Symbol) -> SymbolOutcome {
        let outcome = SymbolOutcome::from(self.process(symbol).await);
        match &outcome {
            SymbolOutcome::Opportunity(o) => info!(score = o.score, "Opportunity found"),
            SymbolOutcome::NoSignal => debug!("No qualifying signals"),
            SymbolOutcome::NoData(reason) => warn!("No usable data: {}", reason),
            SymbolOutcome::ComputeError(reason) => error!("Analysis failed: {}", reason),
        }
        outcome
    }
}

/// # Summary
/// 扫描编排器：对标的池中的每个标的并发执行流水线，汇总并按分数排序。
///
/// # Invariants
/// - 同时在途的任务数不超过并发上限。
/// - 任务之间不共享可变状态，只通过完成值回传结果；单个标的失败不影响其他标的。
/// - 输出顺序只由收集完成后的排序决定（分数降序，同分保持完成顺序）。
pub struct Scanner {
    pipeline: Arc<Pipeline>,
}

impl Scanner {
    pub fn new(
        fetcher: HistoryFetcher,
        engine: IndicatorEngine,
        evaluator: SignalEvaluator,
    ) -> Self {
        Self {
            pipeline: Arc::new(Pipeline {
                fetcher,
                engine,
                evaluator,
            }),
        }
    }

    /// # Summary
    /// 扫描标的池并返回排序后的机会列表。
    pub async fn scan<I>(&self, universe: I, concurrency: usize) -> Vec<Opportunity>
    where
        I: IntoIterator<Item = Symbol>,
    {
        self.scan_with_report(universe, concurrency)
            .await
            .opportunities
    }

    /// # Summary
    /// 扫描标的池并返回完整的扫描汇总。
    ///
    /// # Logic
    /// 1. 先派发至多 `concurrency` 个任务（下限为 1）。
    /// 2. 每完成一个任务就记录其结果，并派发下一个待处理标的。
    /// 3. 任务 panic 计为计算失败，不影响其他任务。
    /// 4. 全部完成后按分数降序稳定排序。
    ///
    /// # Arguments
    /// * `universe`: 待扫描的标的。
    /// * `concurrency`: 并发工作者上限。
    ///
    /// # Returns
    /// 扫描汇总 `ScanReport`。
    pub async fn scan_with_report<I>(&self, universe: I, concurrency: usize) -> ScanReport
    where
        I: IntoIterator<Item = Symbol>,
    {
        let limit = concurrency.max(1);
        let mut pending = universe.into_iter();
        let mut tasks: JoinSet<(Symbol, SymbolOutcome)> = JoinSet::new();
        let mut report = ScanReport::default();

        for symbol in pending.by_ref().take(limit) {
            self.spawn(&mut tasks, symbol);
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((symbol, outcome)) => report.record(symbol, outcome),
                Err(e) => {
                    error!("Scan task aborted: {}", e);
                    report.record_aborted();
                }
            }
            if let Some(symbol) = pending.next() {
                self.spawn(&mut tasks, symbol);
            }
        }

        report.rank();
        info!(
            scanned = report.scanned,
            opportunities = report.opportunities.len(),
            no_signal = report.no_signal,
            no_data = report.no_data,
            compute_errors = report.compute_errors,
            "Scan completed"
        );
        report
    }

    fn spawn(&self, tasks: &mut JoinSet<(Symbol, SymbolOutcome)>, symbol: Symbol) {
        let pipeline = Arc::clone(&self.pipeline);
        let span = info_span!("scan_symbol", symbol = %symbol);
        tasks.spawn(
            async move {
                let outcome = pipeline.run(&symbol).await;
                (symbol, outcome)
            }
            .instrument(span),
        );
    }
}
