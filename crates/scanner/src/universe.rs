use radar_core::common::Symbol;
use radar_core::market::port::ConstituentSource;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// # Summary
/// 标的池解析器：合并固定种子列表与指数成分股，去重并校验。
///
/// # Invariants
/// - 返回集合中的每个元素都是合法的 `Symbol`。
/// - 成分股来源失败只会让其贡献为空，种子列表照常生效。
pub struct UniverseResolver {
    // 指数成分股来源
    source: Arc<dyn ConstituentSource>,
    // 固定种子列表
    seeds: Vec<String>,
}

impl UniverseResolver {
    pub fn new(source: Arc<dyn ConstituentSource>, seeds: Vec<String>) -> Self {
        Self { source, seeds }
    }

    /// # Summary
    /// 解析候选标的集合。
    ///
    /// # Logic
    /// 1. 拉取成分股列表，失败时记录告警并以空列表继续。
    /// 2. 与种子列表合并。
    /// 3. 逐个规范化，丢弃非法代码；集合自动去重。
    ///
    /// # Returns
    /// 合法且去重后的标的集合（有序集合，便于日志与截断的确定性）。
    pub async fn resolve(&self) -> BTreeSet<Symbol> {
        let constituents = match self.source.fetch_symbols().await {
            Ok(list) => list,
            Err(e) => {
                warn!("Failed to fetch index constituents, using seed list only: {}", e);
                Vec::new()
            }
        };

        let candidates = constituents.len() + self.seeds.len();
        let universe: BTreeSet<Symbol> = constituents
            .iter()
            .chain(&self.seeds)
            .filter_map(|raw| match Symbol::normalize(raw) {
                Ok(symbol) => Some(symbol),
                Err(e) => {
                    debug!("Skipping ticker: {}", e);
                    None
                }
            })
            .collect();

        info!(
            candidates,
            valid = universe.len(),
            "Found {} valid symbols",
            universe.len()
        );
        universe
    }
}
