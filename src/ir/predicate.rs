//! Compare predicates

/// Which compare instruction a predicate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpKind {
    /// `icmp`
    Int,
    /// `fcmp`
    Float,
}

impl std::fmt::Display for CmpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmpKind::Int => write!(f, "icmp"),
            CmpKind::Float => write!(f, "fcmp"),
        }
    }
}

/// Relational operator of an `icmp` or `fcmp` instruction.
///
/// Float predicates prefixed with `O` are ordered (false if either operand is
/// NaN), those prefixed with `U` are unordered (true if either operand is NaN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpPredicate {
    FcmpFalse,
    FcmpOeq,
    FcmpOgt,
    FcmpOge,
    FcmpOlt,
    FcmpOle,
    FcmpOne,
    FcmpOrd,
    FcmpUno,
    FcmpUeq,
    FcmpUgt,
    FcmpUge,
    FcmpUlt,
    FcmpUle,
    FcmpUne,
    FcmpTrue,
    IcmpEq,
    IcmpNe,
    IcmpUgt,
    IcmpUge,
    IcmpUlt,
    IcmpUle,
    IcmpSgt,
    IcmpSge,
    IcmpSlt,
    IcmpSle,
}

impl CmpPredicate {
    /// Every predicate, float family first
    pub const ALL: [CmpPredicate; 26] = [
        CmpPredicate::FcmpFalse,
        CmpPredicate::FcmpOeq,
        CmpPredicate::FcmpOgt,
        CmpPredicate::FcmpOge,
        CmpPredicate::FcmpOlt,
        CmpPredicate::FcmpOle,
        CmpPredicate::FcmpOne,
        CmpPredicate::FcmpOrd,
        CmpPredicate::FcmpUno,
        CmpPredicate::FcmpUeq,
        CmpPredicate::FcmpUgt,
        CmpPredicate::FcmpUge,
        CmpPredicate::FcmpUlt,
        CmpPredicate::FcmpUle,
        CmpPredicate::FcmpUne,
        CmpPredicate::FcmpTrue,
        CmpPredicate::IcmpEq,
        CmpPredicate::IcmpNe,
        CmpPredicate::IcmpUgt,
        CmpPredicate::IcmpUge,
        CmpPredicate::IcmpUlt,
        CmpPredicate::IcmpUle,
        CmpPredicate::IcmpSgt,
        CmpPredicate::IcmpSge,
        CmpPredicate::IcmpSlt,
        CmpPredicate::IcmpSle,
    ];

    /// Look up a predicate by its textual keyword, e.g. `("uge", Float)`.
    ///
    /// The same keyword names different predicates for `icmp` and `fcmp`
    /// (`ugt` is unsigned for integers, unordered for floats), so the kind is
    /// required.
    pub fn parse(kind: CmpKind, keyword: &str) -> Option<Self> {
        let pred = match (kind, keyword) {
            (CmpKind::Int, "eq") => CmpPredicate::IcmpEq,
            (CmpKind::Int, "ne") => CmpPredicate::IcmpNe,
            (CmpKind::Int, "ugt") => CmpPredicate::IcmpUgt,
            (CmpKind::Int, "uge") => CmpPredicate::IcmpUge,
            (CmpKind::Int, "ult") => CmpPredicate::IcmpUlt,
            (CmpKind::Int, "ule") => CmpPredicate::IcmpUle,
            (CmpKind::Int, "sgt") => CmpPredicate::IcmpSgt,
            (CmpKind::Int, "sge") => CmpPredicate::IcmpSge,
            (CmpKind::Int, "slt") => CmpPredicate::IcmpSlt,
            (CmpKind::Int, "sle") => CmpPredicate::IcmpSle,
            (CmpKind::Float, "false") => CmpPredicate::FcmpFalse,
            (CmpKind::Float, "oeq") => CmpPredicate::FcmpOeq,
            (CmpKind::Float, "ogt") => CmpPredicate::FcmpOgt,
            (CmpKind::Float, "oge") => CmpPredicate::FcmpOge,
            (CmpKind::Float, "olt") => CmpPredicate::FcmpOlt,
            (CmpKind::Float, "ole") => CmpPredicate::FcmpOle,
            (CmpKind::Float, "one") => CmpPredicate::FcmpOne,
            (CmpKind::Float, "ord") => CmpPredicate::FcmpOrd,
            (CmpKind::Float, "uno") => CmpPredicate::FcmpUno,
            (CmpKind::Float, "ueq") => CmpPredicate::FcmpUeq,
            (CmpKind::Float, "ugt") => CmpPredicate::FcmpUgt,
            (CmpKind::Float, "uge") => CmpPredicate::FcmpUge,
            (CmpKind::Float, "ult") => CmpPredicate::FcmpUlt,
            (CmpKind::Float, "ule") => CmpPredicate::FcmpUle,
            (CmpKind::Float, "une") => CmpPredicate::FcmpUne,
            (CmpKind::Float, "true") => CmpPredicate::FcmpTrue,
            _ => return None,
        };
        Some(pred)
    }

    pub fn kind(self) -> CmpKind {
        match self {
            CmpPredicate::IcmpEq
            | CmpPredicate::IcmpNe
            | CmpPredicate::IcmpUgt
            | CmpPredicate::IcmpUge
            | CmpPredicate::IcmpUlt
            | CmpPredicate::IcmpUle
            | CmpPredicate::IcmpSgt
            | CmpPredicate::IcmpSge
            | CmpPredicate::IcmpSlt
            | CmpPredicate::IcmpSle => CmpKind::Int,
            _ => CmpKind::Float,
        }
    }

    /// The keyword as written after `icmp`/`fcmp`
    pub fn keyword(self) -> &'static str {
        match self {
            CmpPredicate::FcmpFalse => "false",
            CmpPredicate::FcmpOeq => "oeq",
            CmpPredicate::FcmpOgt => "ogt",
            CmpPredicate::FcmpOge => "oge",
            CmpPredicate::FcmpOlt => "olt",
            CmpPredicate::FcmpOle => "ole",
            CmpPredicate::FcmpOne => "one",
            CmpPredicate::FcmpOrd => "ord",
            CmpPredicate::FcmpUno => "uno",
            CmpPredicate::FcmpUeq => "ueq",
            CmpPredicate::FcmpUgt | CmpPredicate::IcmpUgt => "ugt",
            CmpPredicate::FcmpUge | CmpPredicate::IcmpUge => "uge",
            CmpPredicate::FcmpUlt | CmpPredicate::IcmpUlt => "ult",
            CmpPredicate::FcmpUle | CmpPredicate::IcmpUle => "ule",
            CmpPredicate::FcmpUne => "une",
            CmpPredicate::FcmpTrue => "true",
            CmpPredicate::IcmpEq => "eq",
            CmpPredicate::IcmpNe => "ne",
            CmpPredicate::IcmpSgt => "sgt",
            CmpPredicate::IcmpSge => "sge",
            CmpPredicate::IcmpSlt => "slt",
            CmpPredicate::IcmpSle => "sle",
        }
    }
}

impl std::fmt::Display for CmpPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_keyword() {
        for pred in CmpPredicate::ALL {
            assert_eq!(CmpPredicate::parse(pred.kind(), pred.keyword()), Some(pred));
        }
    }

    #[test]
    fn test_keyword_depends_on_kind() {
        assert_eq!(
            CmpPredicate::parse(CmpKind::Int, "ugt"),
            Some(CmpPredicate::IcmpUgt)
        );
        assert_eq!(
            CmpPredicate::parse(CmpKind::Float, "ugt"),
            Some(CmpPredicate::FcmpUgt)
        );
        assert_eq!(CmpPredicate::parse(CmpKind::Int, "oeq"), None);
        assert_eq!(CmpPredicate::parse(CmpKind::Float, "sgt"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CmpPredicate::FcmpUge.to_string(), "fcmp uge");
        assert_eq!(CmpPredicate::IcmpSlt.to_string(), "icmp slt");
    }
}
