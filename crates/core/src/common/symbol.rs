use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// # Summary
/// 代码校验失败的原因。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    // 去除空白后为空串
    #[error("Empty ticker")]
    Empty,
    // 命中某条排除规则，`rule` 为规则名
    #[error("Ticker {symbol} excluded by rule `{rule}`")]
    Excluded { symbol: String, rule: &'static str },
}

/// # Summary
/// 一条具名的排除规则：对已规范化（去空白、转大写）的代码做判定，命中即剔除。
struct ExclusionRule {
    name: &'static str,
    matches: fn(&str) -> bool,
}

/// 排除规则表，按顺序求值，以第一条命中的规则作为剔除原因。
///
/// | 规则 | 命中条件 |
/// |---|---|
/// | `dollar_sign` | 含 `$` |
/// | `warrant_suffix` | 以 `.W` 结尾 |
/// | `unit_suffix` | 以 `.U` 结尾 |
/// | `numeric_suffix` | 以数字结尾 |
/// | `warrant_series_suffix` | 以 `.WS` 结尾 |
/// | `rights_suffix` | 以 `.RT` 结尾 |
/// | `preferred_warrant_suffix` | 以 `.PW` 结尾 |
/// | `letter_w_suffix` | 以"至少一个大写字母 + `W`"结尾 |
/// | `dot_notation` | 含 `.` |
/// | `caret_prefix` | 含 `^` |
///
/// 多条规则互有覆盖（任何含 `.` 的代码都会被 `dot_notation` 剔除），
/// 对外承诺的是所有规则的并集。
const EXCLUSION_RULES: &[ExclusionRule] = &[
    ExclusionRule {
        name: "dollar_sign",
        matches: contains_dollar,
    },
    ExclusionRule {
        name: "warrant_suffix",
        matches: |s| s.ends_with(".W"),
    },
    ExclusionRule {
        name: "unit_suffix",
        matches: |s| s.ends_with(".U"),
    },
    ExclusionRule {
        name: "numeric_suffix",
        matches: ends_with_digit,
    },
    ExclusionRule {
        name: "warrant_series_suffix",
        matches: |s| s.ends_with(".WS"),
    },
    ExclusionRule {
        name: "rights_suffix",
        matches: |s| s.ends_with(".RT"),
    },
    ExclusionRule {
        name: "preferred_warrant_suffix",
        matches: |s| s.ends_with(".PW"),
    },
    ExclusionRule {
        name: "letter_w_suffix",
        matches: ends_with_letter_then_w,
    },
    ExclusionRule {
        name: "dot_notation",
        matches: |s| s.contains('.'),
    },
    ExclusionRule {
        name: "caret_prefix",
        matches: |s| s.contains('^'),
    },
];

fn contains_dollar(s: &str) -> bool {
    s.contains('$')
}

fn ends_with_digit(s: &str) -> bool {
    s.chars().next_back().is_some_and(char::is_numeric)
}

fn ends_with_letter_then_w(s: &str) -> bool {
    let mut tail = s.chars().rev();
    matches!(
        (tail.next(), tail.next()),
        (Some('W'), Some(c)) if c.is_ascii_uppercase()
    )
}

/// # Summary
/// 已规范化的证券代码。
///
/// # Invariants
/// - 非空、全大写，且不命中 `EXCLUSION_RULES` 中的任何一条。
/// - 只能通过 `Symbol::normalize`（或 `FromStr` / 反序列化）构造，构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// # Summary
    /// 规范化并校验原始代码字符串。
    ///
    /// # Logic
    /// 1. 去除首尾空白并转为大写。
    /// 2. 空串直接拒绝。
    /// 3. 依次应用排除规则，命中任一条即拒绝并带回规则名。
    ///
    /// # Arguments
    /// * `raw`: 来自种子列表或成分股列表的原始代码。
    ///
    /// # Returns
    /// 合法则返回 `Symbol`，否则返回 `SymbolError`。
    pub fn normalize(raw: &str) -> Result<Self, SymbolError> {
        let candidate = raw.trim().to_uppercase();
        if candidate.is_empty() {
            return Err(SymbolError::Empty);
        }

        if let Some(rule) = EXCLUSION_RULES.iter().find(|r| (r.matches)(&candidate)) {
            return Err(SymbolError::Excluded {
                symbol: candidate,
                rule: rule.name,
            });
        }

        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_by(raw: &str) -> Option<&'static str> {
        match Symbol::normalize(raw) {
            Err(SymbolError::Excluded { rule, .. }) => Some(rule),
            _ => None,
        }
    }

    #[test]
    fn test_normalize_trims_and_uppercases() {
        let symbol = Symbol::normalize("  aapl \n").unwrap();
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn test_empty_and_blank_are_rejected() {
        assert_eq!(Symbol::normalize(""), Err(SymbolError::Empty));
        assert_eq!(Symbol::normalize("   "), Err(SymbolError::Empty));
    }

    #[test]
    fn test_every_exclusion_pattern_is_rejected() {
        let cases = [
            "$SPX", "ABC$", "ACAH.W", "ACAH.U", "ACAH.WS", "ACAH.RT", "ACAH.PW", "ABC1", "ABC123",
            "GOOGW", "SNOW", "BRK.B", "BF.B", "^GSPC", "^VIX", "7203",
        ];
        for raw in cases {
            assert!(
                Symbol::normalize(raw).is_err(),
                "{} should have been rejected",
                raw
            );
        }
    }

    #[test]
    fn test_first_matching_rule_is_reported() {
        assert_eq!(rejected_by("$ABC"), Some("dollar_sign"));
        assert_eq!(rejected_by("abc.w"), Some("warrant_suffix"));
        assert_eq!(rejected_by("ABC.U"), Some("unit_suffix"));
        assert_eq!(rejected_by("ABC2"), Some("numeric_suffix"));
        assert_eq!(rejected_by("ABC.WS"), Some("warrant_series_suffix"));
        assert_eq!(rejected_by("ABC.RT"), Some("rights_suffix"));
        assert_eq!(rejected_by("ABC.PW"), Some("preferred_warrant_suffix"));
        assert_eq!(rejected_by("ABCW"), Some("letter_w_suffix"));
        assert_eq!(rejected_by("BRK.B"), Some("dot_notation"));
        assert_eq!(rejected_by("^DJI"), Some("caret_prefix"));
    }

    #[test]
    fn test_plain_tickers_are_accepted() {
        for raw in ["AAPL", "V", "W", "MSFT", "GOOGL", "KO", "BRKB", "WMT"] {
            assert!(Symbol::normalize(raw).is_ok(), "{} should be valid", raw);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [" msft", "Nvda ", "jpm", "V"] {
            let once = Symbol::normalize(raw).unwrap();
            let twice = Symbol::normalize(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Symbol = serde_json::from_str("\"tsla\"").unwrap();
        assert_eq!(ok.as_str(), "TSLA");
        assert!(serde_json::from_str::<Symbol>("\"BRK.B\"").is_err());
    }
}
