//! IR model - functions, blocks and the instructions the analysis inspects

mod predicate;

pub use predicate::{CmpKind, CmpPredicate};

/// A parsed IR file
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub functions: Vec<Function>,
}

/// A function definition with its blocks in listed order
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    /// All instructions in program order: blocks as listed, then
    /// instructions within each block as listed
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|block| block.instructions.iter())
    }
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub label: String,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone)]
pub struct Instruction {
    /// SSA name the instruction defines, without the leading `%`
    pub result: Option<String>,
    pub kind: InstKind,
}

impl Instruction {
    pub fn new(result: Option<String>, kind: InstKind) -> Self {
        Self { result, kind }
    }
}

/// Closed set of instruction shapes the analysis distinguishes
#[derive(Debug, Clone)]
pub enum InstKind {
    /// `br`
    Branch(Branch),
    /// `icmp` / `fcmp`
    Compare(Compare),
    /// Anything else, kept only by opcode
    Other { opcode: String },
}

#[derive(Debug, Clone)]
pub enum Branch {
    /// `br label %dest`
    Unconditional { dest: String },
    /// `br i1 %cond, label %if_true, label %if_false`
    Conditional {
        condition: Condition,
        if_true: String,
        if_false: String,
    },
}

/// What drives a conditional branch
#[derive(Debug, Clone)]
pub enum Condition {
    /// The condition is the result of a compare instruction
    Compare(Compare),
    /// Any other value: argument, constant, phi, logical op, call result...
    Value(Operand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub predicate: CmpPredicate,
    pub lhs: Operand,
    pub rhs: Operand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `%name`
    Local(String),
    /// `@name`
    Global(String),
    /// Literal or constant expression, kept as written
    Constant(String),
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Local(name) => write!(f, "%{}", name),
            Operand::Global(name) => write!(f, "@{}", name),
            Operand::Constant(text) => write!(f, "{}", text),
        }
    }
}

impl std::fmt::Display for Compare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}, {}", self.predicate, self.lhs, self.rhs)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Compare(cmp) => write!(f, "{}", cmp),
            Condition::Value(operand) => write!(f, "{}", operand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_display() {
        let cmp = Condition::Compare(Compare {
            predicate: CmpPredicate::FcmpUge,
            lhs: Operand::Local("x".to_string()),
            rhs: Operand::Constant("1.0".to_string()),
        });
        assert_eq!(cmp.to_string(), "fcmp uge %x, 1.0");

        let global = Condition::Value(Operand::Global("flag".to_string()));
        assert_eq!(global.to_string(), "@flag");
    }
}
