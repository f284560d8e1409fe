// crates/mp_track/src/classifier.rs

//! 出口分类器
//!
//! 会话开始时从流场收集全部净出流（通量 > 0）的 patch，
//! 按注册顺序保存名称和 owner 单元集合。粒子离开网格后，
//! 用其最后定位的单元依次匹配，第一个包含该单元的出口胜出。

use std::collections::HashSet;

use mp_mesh::{CellId, FlowOracle, FluxSign};
use tracing::{debug, warn};

/// 已注册的出口 patch
#[derive(Debug, Clone)]
pub struct OutletPatch {
    /// patch 名称
    pub name: String,
    cells: HashSet<CellId>,
}

impl OutletPatch {
    /// 创建出口条目
    pub fn new(name: impl Into<String>, cells: impl IntoIterator<Item = CellId>) -> Self {
        Self {
            name: name.into(),
            cells: cells.into_iter().collect(),
        }
    }

    /// 是否包含单元
    #[inline]
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.contains(&cell)
    }

    /// owner 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }
}

/// 出口分类器
#[derive(Debug, Clone, Default)]
pub struct OutletClassifier {
    outlets: Vec<OutletPatch>,
}

impl OutletClassifier {
    /// 从流场的 patch 注册表构建
    pub fn from_oracle<O: FlowOracle + ?Sized>(oracle: &O) -> Self {
        let outlets = oracle
            .all_patches()
            .into_iter()
            .filter(|patch| oracle.net_flux_sign(patch) == FluxSign::Positive)
            .map(|patch| {
                let cells = patch.owning_cells();
                OutletPatch {
                    name: patch.name,
                    cells,
                }
            })
            .collect();
        Self::from_outlets(outlets)
    }

    /// 由出口列表直接构建（保持给定顺序）
    pub fn from_outlets(outlets: Vec<OutletPatch>) -> Self {
        for (i, a) in outlets.iter().enumerate() {
            for b in &outlets[i + 1..] {
                if a.cells.iter().any(|c| b.cells.contains(c)) {
                    warn!(
                        "出口 '{}' 与 '{}' 共享单元，重叠单元按注册顺序归入 '{}'",
                        a.name, b.name, a.name
                    );
                }
            }
        }
        debug!("出口分类器: {} 个出口", outlets.len());
        Self { outlets }
    }

    /// 单元所属的第一个出口
    pub fn classify(&self, cell: CellId) -> Option<&str> {
        self.outlets
            .iter()
            .find(|outlet| outlet.contains(cell))
            .map(|outlet| outlet.name.as_str())
    }

    /// 已注册出口
    #[inline]
    pub fn outlets(&self) -> &[OutletPatch] {
        &self.outlets
    }

    /// 出口名称（注册顺序）
    pub fn names(&self) -> Vec<&str> {
        self.outlets.iter().map(|o| o.name.as_str()).collect()
    }

    /// 是否没有出口
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[usize]) -> Vec<CellId> {
        ids.iter().map(|&i| CellId::new(i)).collect()
    }

    #[test]
    fn test_classify_first_match_wins() {
        let classifier = OutletClassifier::from_outlets(vec![
            OutletPatch::new("outlet_a", ids(&[1, 2])),
            OutletPatch::new("outlet_b", ids(&[2, 3])),
        ]);

        assert_eq!(classifier.classify(CellId::new(1)), Some("outlet_a"));
        assert_eq!(classifier.classify(CellId::new(2)), Some("outlet_a"));
        assert_eq!(classifier.classify(CellId::new(3)), Some("outlet_b"));
        assert_eq!(classifier.classify(CellId::new(9)), None);
        assert_eq!(classifier.names(), vec!["outlet_a", "outlet_b"]);
    }

    #[test]
    fn test_empty_classifier() {
        let classifier = OutletClassifier::default();
        assert!(classifier.is_empty());
        assert_eq!(classifier.classify(CellId::new(0)), None);
    }
}
