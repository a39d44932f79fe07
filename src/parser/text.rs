//! Textual LLVM IR reader
//!
//! Reads just enough of a `.ll` file to build the IR model: function bodies,
//! block labels, `br`, `icmp` and `fcmp`. Every other instruction is kept
//! only by its opcode, and everything outside function bodies is skipped.

use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::lexer::{bracket_balance, join, split_top_level, strip_comment, tokenize, Token};
use super::resolver::ConditionResolver;
use crate::ir::{
    BasicBlock, Branch, CmpKind, CmpPredicate, Compare, Condition, Function, InstKind,
    Instruction, Module, Operand,
};

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("line {line}: malformed branch: {detail}")]
    MalformedBranch { line: usize, detail: String },

    #[error("line {line}: malformed compare: {detail}")]
    MalformedCompare { line: usize, detail: String },

    #[error("line {line}: unknown {kind} predicate '{keyword}'")]
    UnknownPredicate {
        line: usize,
        kind: CmpKind,
        keyword: String,
    },

    #[error("line {line}: duplicate block label '{label}' in @{function}")]
    DuplicateLabel {
        line: usize,
        label: String,
        function: String,
    },

    #[error("function @{name} starting at line {line} is never closed")]
    UnterminatedFunction { name: String, line: usize },
}

/// Flags that may sit between `fcmp` and its predicate
const FAST_MATH_FLAGS: &[&str] = &[
    "nnan", "ninf", "nsz", "arcp", "contract", "afn", "reassoc", "fast",
];

/// Reader for `.ll` files
pub struct IrParser;

impl IrParser {
    pub fn parse_file(path: &Path) -> Result<Module, ParserError> {
        let source = fs::read_to_string(path)?;
        Self::parse_str(&source)
    }

    pub fn parse_str(source: &str) -> Result<Module, ParserError> {
        let mut module = Module::default();
        let mut current: Option<FunctionBuilder> = None;
        // Header of a `define` whose opening brace is on a later line
        let mut pending_header: Option<(usize, Vec<Token>)> = None;
        // Instruction split over several lines by `[ ... ]`
        let mut continued: Option<(usize, Vec<Token>)> = None;

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let tokens = tokenize(strip_comment(raw));
            if tokens.is_empty() {
                continue;
            }

            let Some(builder) = current.as_mut() else {
                let header = match pending_header.take() {
                    Some((start, mut header)) => {
                        header.extend(tokens);
                        Some((start, header))
                    }
                    None if tokens[0].is_word("define") => Some((line_no, tokens)),
                    None => None,
                };

                if let Some((start, header)) = header {
                    if header.iter().any(|t| t.is_punct('{')) {
                        let name = function_name(&header);
                        debug!("reading @{} at line {}", name, start);
                        current = Some(FunctionBuilder::new(name, start));
                    } else {
                        pending_header = Some((start, header));
                    }
                }
                continue;
            };

            if let Some((start, mut joined)) = continued.take() {
                joined.extend(tokens);
                if bracket_balance(&joined) > 0 {
                    continued = Some((start, joined));
                } else {
                    builder.push_instruction(parse_instruction(&joined, start)?);
                }
                continue;
            }

            if tokens.len() == 1 && tokens[0].is_punct('}') {
                if let Some(builder) = current.take() {
                    module.functions.push(builder.finish());
                }
                continue;
            }

            if let Some(label) = block_label(&tokens) {
                builder.start_block(label, line_no)?;
                continue;
            }

            if bracket_balance(&tokens) > 0 {
                continued = Some((line_no, tokens));
                continue;
            }

            builder.push_instruction(parse_instruction(&tokens, line_no)?);
        }

        if let Some(builder) = current {
            return Err(ParserError::UnterminatedFunction {
                name: builder.name,
                line: builder.start_line,
            });
        }

        Ok(module)
    }
}

/// Collects blocks for the function being read
struct FunctionBuilder {
    name: String,
    start_line: usize,
    blocks: Vec<BasicBlock>,
    labels: HashSet<String>,
}

impl FunctionBuilder {
    fn new(name: String, start_line: usize) -> Self {
        Self {
            name,
            start_line,
            blocks: Vec::new(),
            labels: HashSet::new(),
        }
    }

    fn start_block(&mut self, label: String, line: usize) -> Result<(), ParserError> {
        if !self.labels.insert(label.clone()) {
            return Err(ParserError::DuplicateLabel {
                line,
                label,
                function: self.name.clone(),
            });
        }
        self.blocks.push(BasicBlock {
            label,
            instructions: Vec::new(),
        });
        Ok(())
    }

    fn push_instruction(&mut self, instruction: Instruction) {
        if self.blocks.is_empty() {
            // Unlabelled entry block. It cannot be a branch target, so it gets
            // an empty label that no written label can collide with.
            self.blocks.push(BasicBlock {
                label: String::new(),
                instructions: Vec::new(),
            });
        }
        if let Some(block) = self.blocks.last_mut() {
            block.instructions.push(instruction);
        }
    }

    fn finish(self) -> Function {
        let mut function = Function {
            name: self.name,
            blocks: self.blocks,
        };
        ConditionResolver::resolve(&mut function);
        function
    }
}

fn function_name(header: &[Token]) -> String {
    header
        .iter()
        .find_map(|t| match t {
            Token::Global(name) => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

/// `name:`, `"quoted name":` or `42:`
fn block_label(tokens: &[Token]) -> Option<String> {
    match tokens {
        [Token::Word(name), Token::Punct(':')] | [Token::Str(name), Token::Punct(':')] => {
            Some(name.clone())
        }
        _ => None,
    }
}

fn parse_instruction(tokens: &[Token], line: usize) -> Result<Instruction, ParserError> {
    let (result, body) = match tokens {
        [Token::Local(name), Token::Punct('='), rest @ ..] => (Some(name.clone()), rest),
        _ => (None, tokens),
    };

    let kind = match body.first() {
        Some(Token::Word(op)) if op == "br" => InstKind::Branch(parse_branch(&body[1..], line)?),
        Some(Token::Word(op)) if op == "icmp" => {
            InstKind::Compare(parse_compare(CmpKind::Int, &body[1..], line)?)
        }
        Some(Token::Word(op)) if op == "fcmp" => {
            InstKind::Compare(parse_compare(CmpKind::Float, &body[1..], line)?)
        }
        Some(tok) => InstKind::Other {
            opcode: tok.to_string(),
        },
        None => InstKind::Other {
            opcode: String::new(),
        },
    };

    Ok(Instruction::new(result, kind))
}

fn parse_branch(tokens: &[Token], line: usize) -> Result<Branch, ParserError> {
    let malformed = |detail: &str| ParserError::MalformedBranch {
        line,
        detail: detail.to_string(),
    };

    let parts: Vec<&[Token]> = split_top_level(tokens)
        .into_iter()
        .filter(|part| !is_metadata(part))
        .collect();

    match parts.as_slice() {
        [dest] => Ok(Branch::Unconditional {
            dest: label_target(dest).ok_or_else(|| malformed("expected `label %dest`"))?,
        }),
        [cond, if_true, if_false] => {
            let condition = typed_value(cond).ok_or_else(|| malformed("missing condition"))?;
            Ok(Branch::Conditional {
                condition: Condition::Value(condition),
                if_true: label_target(if_true)
                    .ok_or_else(|| malformed("expected `label %true_dest`"))?,
                if_false: label_target(if_false)
                    .ok_or_else(|| malformed("expected `label %false_dest`"))?,
            })
        }
        _ => Err(malformed(&format!(
            "expected 1 or 3 operands, found {}",
            parts.len()
        ))),
    }
}

fn parse_compare(kind: CmpKind, tokens: &[Token], line: usize) -> Result<Compare, ParserError> {
    let malformed = |detail: &str| ParserError::MalformedCompare {
        line,
        detail: detail.to_string(),
    };

    let mut rest = tokens;
    while let Some(Token::Word(flag)) = rest.first() {
        let is_flag = match kind {
            CmpKind::Int => flag == "samesign",
            CmpKind::Float => FAST_MATH_FLAGS.contains(&flag.as_str()),
        };
        if !is_flag {
            break;
        }
        rest = &rest[1..];
    }

    let keyword = match rest.first() {
        Some(Token::Word(keyword)) => keyword,
        _ => return Err(malformed("missing predicate")),
    };
    let predicate =
        CmpPredicate::parse(kind, keyword).ok_or_else(|| ParserError::UnknownPredicate {
            line,
            kind,
            keyword: keyword.clone(),
        })?;

    let parts: Vec<&[Token]> = split_top_level(&rest[1..])
        .into_iter()
        .filter(|part| !is_metadata(part))
        .collect();

    match parts.as_slice() {
        [lhs, rhs] => Ok(Compare {
            predicate,
            lhs: typed_value(lhs).ok_or_else(|| malformed("missing left operand"))?,
            rhs: value(rhs).ok_or_else(|| malformed("missing right operand"))?,
        }),
        _ => Err(malformed("expected `<type> <lhs>, <rhs>`")),
    }
}

/// `, !dbg !12` and similar trailing attachments
fn is_metadata(part: &[Token]) -> bool {
    matches!(part.first(), Some(Token::Word(w)) if w.starts_with('!'))
}

/// `label %dest`
fn label_target(part: &[Token]) -> Option<String> {
    match part {
        [label, Token::Local(dest)] if label.is_word("label") => Some(dest.clone()),
        _ => None,
    }
}

/// The value of a `<type> <value>` operand; the type is everything before it
fn typed_value(part: &[Token]) -> Option<Operand> {
    let start = match part.last()? {
        // Constant expression: keyword followed by a parenthesized body
        Token::Punct(')') => {
            let open = matching_open(part, part.len() - 1)?;
            open.checked_sub(1)?
        }
        _ => part.len() - 1,
    };
    if start == 0 {
        return None;
    }
    value(&part[start..])
}

/// A bare value with no type prefix
fn value(part: &[Token]) -> Option<Operand> {
    match part {
        [] => None,
        [Token::Local(name)] => Some(Operand::Local(name.clone())),
        [Token::Global(name)] => Some(Operand::Global(name.clone())),
        _ => Some(Operand::Constant(join(part))),
    }
}

fn matching_open(tokens: &[Token], close: usize) -> Option<usize> {
    let mut depth = 0;
    for i in (0..=close).rev() {
        match tokens[i] {
            Token::Punct(')') => depth += 1,
            Token::Punct('(') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
