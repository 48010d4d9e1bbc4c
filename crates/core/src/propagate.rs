//! Level propagation across brace-delimited groups.
//!
//! A block's opening and closing lines must be emitted in the same loop as
//! the statements inside them. Two strategies are offered:
//!
//! - [`PropagationStrategy::Heuristic`]: one forward pass lifting lone `}`
//!   lines to the previous statement's level, then one backward pass lifting
//!   lone `{` lines to the following statement's level. Only neighbours
//!   are consulted, which is enough for one-statement blocks.
//! - [`PropagationStrategy::BlockTree`]: the statement list is folded into
//!   nested blocks and every line of a top-level block takes the highest
//!   level found anywhere inside it.
//!
//! Both only ever raise levels; statement count and text never change.

use crate::ast::{Level, Statement};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropagationStrategy {
    #[default]
    Heuristic,
    BlockTree,
}

pub fn propagate(statements: &mut [Statement], strategy: PropagationStrategy) {
    match strategy {
        PropagationStrategy::Heuristic => propagate_heuristic(statements),
        PropagationStrategy::BlockTree => propagate_block_tree(statements),
    }
}

pub fn propagate_heuristic(statements: &mut [Statement]) {
    let mut prev: Option<Level> = None;
    for s in statements.iter_mut() {
        if s.closes_block() {
            if let Some(p) = prev {
                s.level = s.level.max(p);
            }
        }
        prev = Some(s.level);
    }

    let mut next: Option<Level> = None;
    for s in statements.iter_mut().rev() {
        if s.opens_block() {
            if let Some(n) = next {
                s.level = s.level.max(n);
            }
        }
        next = Some(s.level);
    }
}

/// A body as a sequence of statements and nested blocks, by index into
/// the statement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNode {
    Statement(usize),
    Block {
        open: usize,
        children: Vec<BlockNode>,
        /// `None` when the body ends before the block is closed.
        close: Option<usize>,
    },
}

impl BlockNode {
    fn max_level(&self, statements: &[Statement]) -> Level {
        match self {
            BlockNode::Statement(i) => statements[*i].level,
            BlockNode::Block {
                open,
                children,
                close,
            } => {
                let mut level = statements[*open].level;
                if let Some(c) = close {
                    level = level.max(statements[*c].level);
                }
                children
                    .iter()
                    .map(|child| child.max_level(statements))
                    .fold(level, Level::max)
            }
        }
    }

    fn raise_to(&self, level: Level, statements: &mut [Statement]) {
        match self {
            BlockNode::Statement(i) => {
                statements[*i].level = statements[*i].level.max(level);
            }
            BlockNode::Block {
                open,
                children,
                close,
            } => {
                statements[*open].level = statements[*open].level.max(level);
                for child in children {
                    child.raise_to(level, statements);
                }
                if let Some(c) = close {
                    statements[*c].level = statements[*c].level.max(level);
                }
            }
        }
    }
}

fn push_node(stack: &mut [(usize, Vec<BlockNode>)], top: &mut Vec<BlockNode>, node: BlockNode) {
    match stack.last_mut() {
        Some((_, children)) => children.push(node),
        None => top.push(node),
    }
}

/// Fold a flat statement list into blocks. A `}` with no open block is
/// kept as a plain statement.
pub fn build_block_tree(statements: &[Statement]) -> Vec<BlockNode> {
    let mut top: Vec<BlockNode> = Vec::new();
    let mut stack: Vec<(usize, Vec<BlockNode>)> = Vec::new();

    for (i, s) in statements.iter().enumerate() {
        if s.opens_block() {
            stack.push((i, Vec::new()));
        } else if s.closes_block() {
            match stack.pop() {
                Some((open, children)) => {
                    let node = BlockNode::Block {
                        open,
                        children,
                        close: Some(i),
                    };
                    push_node(&mut stack, &mut top, node);
                }
                None => top.push(BlockNode::Statement(i)),
            }
        } else {
            push_node(&mut stack, &mut top, BlockNode::Statement(i));
        }
    }

    while let Some((open, children)) = stack.pop() {
        let node = BlockNode::Block {
            open,
            children,
            close: None,
        };
        push_node(&mut stack, &mut top, node);
    }

    top
}

pub fn propagate_block_tree(statements: &mut [Statement]) {
    let tree = build_block_tree(statements);
    for node in &tree {
        if let BlockNode::Block { .. } = node {
            let level = node.max_level(statements);
            node.raise_to(level, statements);
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
