//! Compiles the production list into LALR(1) tables.
//!
//! Construction is LR(1) with same-core merging done on the fly: item-set
//! cores are the state identity, and lookaheads discovered later are unioned
//! into the existing state, which is then reprocessed until the whole
//! machine reaches a fixed point. This yields the LALR(1) automaton with
//! LR(0)-sized state counts.
//!
//! Two conflict classes are expected and resolved by fixed policy:
//!
//! - shift/reduce resolves to the shift (dangling `else`, the lambda arrow
//!   after a bare identifier, assignment after a postfix expression)
//! - reduce/reduce resolves to the rule that appears first in the grammar
//!
//! Anything the policy cannot express, such as two different shift targets
//! for one symbol, is a grammar bug and fails construction.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::{CELL_ACCEPT, CELL_ERROR, GrammarTables};
use crate::grammar::{self, Action, Edition, NONTERM_COUNT, NonTerm, Rule, Symbol};
use crate::lexer::{TERMINAL_COUNT, TokenKind};

const TERM_WORDS: usize = TERMINAL_COUNT.div_ceil(64);

/// Bitset over terminal indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TermSet([u64; TERM_WORDS]);

impl TermSet {
    fn singleton(term: usize) -> Self {
        let mut set = Self::default();
        set.insert(term);
        set
    }

    fn insert(&mut self, term: usize) -> bool {
        let word = term / 64;
        let bit = 1u64 << (term % 64);
        let fresh = self.0[word] & bit == 0;
        self.0[word] |= bit;
        fresh
    }

    fn union(&mut self, other: &TermSet) -> bool {
        let mut changed = false;
        for (word, add) in self.0.iter_mut().zip(other.0.iter()) {
            let merged = *word | add;
            changed |= merged != *word;
            *word = merged;
        }
        changed
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..TERMINAL_COUNT).filter(|&term| self.0[term / 64] & (1u64 << (term % 64)) != 0)
    }
}

/// FIRST sets and nullability per nonterminal.
struct FirstSets {
    first: Vec<TermSet>,
    nullable: Vec<bool>,
}

impl FirstSets {
    fn compute(rules: &[Rule]) -> Self {
        let mut sets = FirstSets {
            first: vec![TermSet::default(); NONTERM_COUNT],
            nullable: vec![false; NONTERM_COUNT],
        };
        let mut changed = true;
        while changed {
            changed = false;
            for rule in rules {
                let lhs = rule.lhs.index();
                let mut all_nullable = true;
                for sym in &rule.rhs {
                    match *sym {
                        Symbol::T(t) => {
                            let mut set = sets.first[lhs];
                            changed |= set.insert(t.terminal_index());
                            sets.first[lhs] = set;
                            all_nullable = false;
                        }
                        Symbol::N(nt) => {
                            let add = sets.first[nt.index()];
                            let mut set = sets.first[lhs];
                            changed |= set.union(&add);
                            sets.first[lhs] = set;
                            if !sets.nullable[nt.index()] {
                                all_nullable = false;
                            }
                        }
                    }
                    if !all_nullable {
                        break;
                    }
                }
                if all_nullable && !sets.nullable[lhs] {
                    sets.nullable[lhs] = true;
                    changed = true;
                }
            }
        }
        sets
    }

    /// FIRST of a symbol sequence followed by the terminals in `tail`.
    fn first_of(&self, syms: &[Symbol], tail: &TermSet) -> TermSet {
        let mut out = TermSet::default();
        for sym in syms {
            match *sym {
                Symbol::T(t) => {
                    out.insert(t.terminal_index());
                    return out;
                }
                Symbol::N(nt) => {
                    out.union(&self.first[nt.index()]);
                    if !self.nullable[nt.index()] {
                        return out;
                    }
                }
            }
        }
        out.union(tail);
        out
    }
}

/// Item core: rule index and dot position. Lookaheads live beside the core,
/// never inside it, so same-core states merge.
type Core = (u16, u8);

struct State {
    /// Sorted kernel cores.
    kernel: Vec<Core>,
    /// Lookahead set per kernel item, parallel to `kernel`.
    lookahead: Vec<TermSet>,
    /// Outgoing edges. Populated once; targets are core-determined and
    /// never change across reprocessing.
    edges: Vec<(Symbol, u16)>,
}

impl State {
    fn edge(&self, sym: Symbol) -> Option<u16> {
        self.edges
            .iter()
            .find(|(s, _)| *s == sym)
            .map(|&(_, target)| target)
    }
}

/// Deterministic ordering key for grouping transitions by symbol.
fn sym_key(sym: Symbol) -> u32 {
    match sym {
        Symbol::T(t) => t.terminal_index() as u32,
        Symbol::N(nt) => 0x1000 + nt.index() as u32,
    }
}

fn closure(
    state: &State,
    rules: &[Rule],
    by_lhs: &[Vec<u16>],
    first: &FirstSets,
) -> IndexMap<Core, TermSet> {
    let mut items: IndexMap<Core, TermSet> = IndexMap::new();
    for (core, la) in state.kernel.iter().zip(state.lookahead.iter()) {
        items.insert(*core, *la);
    }
    let mut changed = true;
    while changed {
        changed = false;
        let mut idx = 0;
        while let Some((&(rule_idx, dot), &la)) = items.get_index(idx) {
            let rhs = &rules[rule_idx as usize].rhs;
            if let Some(Symbol::N(nt)) = rhs.get(dot as usize) {
                let tail = first.first_of(&rhs[dot as usize + 1..], &la);
                for &expansion in &by_lhs[nt.index()] {
                    let entry = items.entry((expansion, 0)).or_default();
                    changed |= entry.union(&tail);
                }
            }
            idx += 1;
        }
    }
    items
}

pub(super) fn build() -> Result<GrammarTables, String> {
    let mut rules = Vec::with_capacity(260);
    rules.push(Rule {
        lhs: NonTerm::Start,
        rhs: vec![Symbol::N(NonTerm::Goal)],
        action: Action::None,
        edition: Edition::Classic,
    });
    rules.extend(grammar::rules());
    for rule in &rules {
        if rule.rhs.len() > u8::MAX as usize {
            return Err(format!("rule too long: {}", rule.display()));
        }
    }

    let first = FirstSets::compute(&rules);
    let mut by_lhs: Vec<Vec<u16>> = vec![Vec::new(); NONTERM_COUNT];
    for (idx, rule) in rules.iter().enumerate() {
        by_lhs[rule.lhs.index()].push(idx as u16);
    }

    let mut states: Vec<State> = vec![State {
        kernel: vec![(0, 0)],
        lookahead: vec![TermSet::singleton(TokenKind::Eof.terminal_index())],
        edges: Vec::new(),
    }];
    let mut by_core: HashMap<Vec<Core>, u16> = HashMap::new();
    by_core.insert(vec![(0, 0)], 0);

    let mut work = vec![0u16];
    let mut queued = vec![true];
    while let Some(sid) = work.pop() {
        queued[sid as usize] = false;
        let items = closure(&states[sid as usize], &rules, &by_lhs, &first);

        // Group advanced items into successor kernels, one per symbol.
        let mut successors: IndexMap<u32, (Symbol, IndexMap<Core, TermSet>)> = IndexMap::new();
        for (&(rule_idx, dot), &la) in items.iter() {
            let rhs = &rules[rule_idx as usize].rhs;
            if let Some(&sym) = rhs.get(dot as usize) {
                let (_, kernel) = successors
                    .entry(sym_key(sym))
                    .or_insert_with(|| (sym, IndexMap::new()));
                kernel.entry((rule_idx, dot + 1)).or_default().union(&la);
            }
        }
        successors.sort_keys();

        for (_, (sym, kernel)) in successors {
            let mut cores: Vec<Core> = kernel.keys().copied().collect();
            cores.sort_unstable();
            let target = match by_core.get(&cores) {
                Some(&existing) => {
                    let state = &mut states[existing as usize];
                    let mut grew = false;
                    for (slot, core) in state.kernel.iter().enumerate() {
                        grew |= state.lookahead[slot].union(&kernel[core]);
                    }
                    if grew && !queued[existing as usize] {
                        queued[existing as usize] = true;
                        work.push(existing);
                    }
                    existing
                }
                None => {
                    if states.len() > u16::MAX as usize {
                        return Err("state count exceeds u16 range".to_string());
                    }
                    let fresh = states.len() as u16;
                    let lookahead = cores.iter().map(|core| kernel[core]).collect();
                    states.push(State {
                        kernel: cores.clone(),
                        lookahead,
                        edges: Vec::new(),
                    });
                    by_core.insert(cores, fresh);
                    queued.push(true);
                    work.push(fresh);
                    fresh
                }
            };
            if states[sid as usize].edge(sym).is_none() {
                states[sid as usize].edges.push((sym, target));
            }
        }
    }

    fill_tables(&rules, &states, &by_lhs, &first)
}

fn fill_tables(
    rules: &[Rule],
    states: &[State],
    by_lhs: &[Vec<u16>],
    first: &FirstSets,
) -> Result<GrammarTables, String> {
    let state_count = states.len();
    let mut actions = vec![CELL_ERROR; state_count * TERMINAL_COUNT];
    let mut gotos = vec![-1i32; state_count * NONTERM_COUNT];
    let mut shift_reduce = 0u32;
    let mut reduce_reduce = 0u32;

    for (sid, state) in states.iter().enumerate() {
        for &(sym, target) in &state.edges {
            match sym {
                Symbol::T(t) => {
                    let cell = &mut actions[sid * TERMINAL_COUNT + t.terminal_index()];
                    let shift = target as i32 + 2;
                    match *cell {
                        CELL_ERROR => *cell = shift,
                        c if c == shift => {}
                        c if c < 0 => {
                            // Policy: shift wins over reduce.
                            *cell = shift;
                            shift_reduce += 1;
                        }
                        c => {
                            return Err(format!(
                                "state {sid}: conflicting shifts {c} and {shift} on {t:?}"
                            ));
                        }
                    }
                }
                Symbol::N(nt) => {
                    gotos[sid * NONTERM_COUNT + nt.index()] = target as i32;
                }
            }
        }

        let items = closure(state, rules, by_lhs, first);
        for (&(rule_idx, dot), la) in items.iter() {
            let rule = &rules[rule_idx as usize];
            if (dot as usize) < rule.rhs.len() {
                continue;
            }
            if rule_idx == 0 {
                // Start -> Goal with the dot at the end accepts on Eof.
                actions[sid * TERMINAL_COUNT + TokenKind::Eof.terminal_index()] = CELL_ACCEPT;
                continue;
            }
            let reduce = -(rule_idx as i32 + 1);
            for term in la.iter() {
                let cell = &mut actions[sid * TERMINAL_COUNT + term];
                match *cell {
                    CELL_ERROR => *cell = reduce,
                    CELL_ACCEPT => {}
                    c if c >= 2 => shift_reduce += 1,
                    c => {
                        // Policy: the rule earlier in the grammar wins.
                        let standing = (-(c + 1)) as u16;
                        if rule_idx < standing {
                            *cell = reduce;
                        }
                        reduce_reduce += 1;
                    }
                }
            }
        }
    }

    Ok(GrammarTables {
        state_count: state_count as u16,
        actions,
        gotos,
        rule_lhs: rules.iter().map(|r| r.lhs.index() as u16).collect(),
        rule_len: rules.iter().map(|r| r.rhs.len() as u8).collect(),
        rule_action: rules.iter().map(|r| r.action).collect(),
        rule_edition: rules.iter().map(|r| r.edition).collect(),
        rule_names: rules.iter().map(Rule::display).collect(),
        shift_reduce_resolved: shift_reduce,
        reduce_reduce_resolved: reduce_reduce,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TERMINALS;
    use crate::tables::ParseAction;

    #[test]
    fn terminal_array_is_aligned() {
        for (idx, kind) in TERMINALS.iter().enumerate() {
            assert_eq!(kind.terminal_index(), idx, "misplaced {kind:?}");
        }
    }

    #[test]
    fn tables_build_without_structural_conflicts() {
        let tables = build().unwrap();
        assert!(tables.state_count > 0);
        assert_eq!(tables.actions.len(), tables.state_count as usize * TERMINAL_COUNT);
        assert_eq!(tables.gotos.len(), tables.state_count as usize * NONTERM_COUNT);
        assert_eq!(tables.rule_count(), grammar::rules().len() + 1);
    }

    #[test]
    fn first_set_of_expression_contains_literals_and_names() {
        let mut rules = vec![Rule {
            lhs: NonTerm::Start,
            rhs: vec![Symbol::N(NonTerm::Goal)],
            action: Action::None,
            edition: Edition::Classic,
        }];
        rules.extend(grammar::rules());
        let first = FirstSets::compute(&rules);
        let expr = &first.first[NonTerm::Expression.index()];
        let has = |t: TokenKind| expr.iter().any(|i| i == t.terminal_index());
        assert!(has(TokenKind::Identifier));
        assert!(has(TokenKind::IntLit));
        assert!(has(TokenKind::New));
        assert!(has(TokenKind::LParen));
        assert!(!has(TokenKind::Class));
    }

    #[test]
    fn empty_unit_drives_to_accept() {
        let tables = build().unwrap();
        // GoalUnit then Eof: shift the goal marker, reduce the empty
        // opt-lists, and accept.
        let mut state = 0u16;
        let mut stack = vec![0u16];
        let mut input = [TokenKind::GoalUnit, TokenKind::Eof].into_iter();
        let mut tok = input.next().unwrap();
        let mut steps = 0;
        loop {
            steps += 1;
            assert!(steps < 64, "no accept within step budget");
            match tables.action(state, tok) {
                ParseAction::Shift(next) => {
                    stack.push(next);
                    state = next;
                    tok = input.next().unwrap();
                }
                ParseAction::Reduce(rule) => {
                    let len = tables.rule_len[rule as usize] as usize;
                    stack.truncate(stack.len() - len);
                    let top = *stack.last().unwrap();
                    let lhs = tables.rule_lhs[rule as usize];
                    let target = tables.gotos
                        [top as usize * NONTERM_COUNT + lhs as usize];
                    assert!(target >= 0, "missing goto after {}", tables.rule_names[rule as usize]);
                    state = target as u16;
                    stack.push(state);
                }
                ParseAction::Accept => break,
                ParseAction::Error => {
                    panic!("error on {tok:?} in state {state}");
                }
            }
        }
    }
}
