//! Page ordering rules and update repair.
//!
//! Rules are `X|Y` pairs meaning page X must be printed before page Y. An
//! update is repaired with one topological sort over the rules that mention
//! two of its pages. Ties are broken by the order the pages already had, so a
//! valid update comes back unchanged.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction::Incoming;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// "X before Y" rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    graph: DiGraphMap<u32, ()>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, before: u32, after: u32) {
        self.graph.add_edge(before, after, ());
    }

    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// True if a rule says `before` must come before `after`.
    pub fn must_precede(&self, before: u32, after: u32) -> bool {
        self.graph.contains_edge(before, after)
    }

    /// No page is preceded by a page that a rule places after it.
    pub fn is_ordered(&self, update: &[u32]) -> bool {
        update
            .iter()
            .tuple_combinations()
            .all(|(&earlier, &later)| !self.must_precede(later, earlier))
    }

    /// Reorder `update` so every applicable rule holds.
    ///
    /// Fails with [`Error::Cycle`] if the rules among the update's pages
    /// contradict each other.
    pub fn reorder(&self, update: &[u32]) -> Result<Vec<u32>> {
        let mut sub: DiGraph<u32, ()> = DiGraph::with_capacity(update.len(), 0);
        let nodes: Vec<NodeIndex> = update.iter().map(|&page| sub.add_node(page)).collect();

        for (&a, &b) in nodes.iter().tuple_combinations() {
            if self.must_precede(sub[a], sub[b]) {
                sub.add_edge(a, b, ());
            }
            if self.must_precede(sub[b], sub[a]) {
                sub.add_edge(b, a, ());
            }
        }

        let mut in_degree: Vec<usize> = nodes
            .iter()
            .map(|&node| sub.neighbors_directed(node, Incoming).count())
            .collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(index, _)| Reverse(index))
            .collect();

        let mut order = Vec::with_capacity(update.len());
        while let Some(Reverse(index)) = ready.pop() {
            order.push(update[index]);
            for next in sub.neighbors(nodes[index]) {
                let j = next.index();
                in_degree[j] -= 1;
                if in_degree[j] == 0 {
                    ready.push(Reverse(j));
                }
            }
        }

        if order.len() < update.len() {
            let pages = in_degree
                .iter()
                .enumerate()
                .filter(|&(_, &degree)| degree > 0)
                .map(|(index, _)| update[index])
                .collect();
            return Err(Error::Cycle { pages });
        }

        Ok(order)
    }
}

/// Rules plus the updates to check
#[derive(Debug, Clone)]
pub struct Manual {
    pub rules: RuleSet,
    pub updates: Vec<Vec<u32>>,
}

impl Manual {
    /// Sum of middle pages of the updates that already follow the rules.
    pub fn sum_ordered_middles(&self) -> u64 {
        let sum: u64 = self
            .updates
            .iter()
            .filter(|update| self.rules.is_ordered(update))
            .filter_map(|update| middle_page(update))
            .map(u64::from)
            .sum();
        info!("ordered middle pages sum to {}", sum);
        sum
    }

    /// Sum of middle pages of the misordered updates after repair.
    pub fn sum_repaired_middles(&self) -> Result<u64> {
        let mut sum = 0;
        for update in &self.updates {
            if self.rules.is_ordered(update) {
                continue;
            }
            let fixed = self.rules.reorder(update)?;
            debug!("repaired {:?} -> {:?}", update, fixed);
            sum += middle_page(&fixed).map_or(0, u64::from);
        }
        info!("repaired middle pages sum to {}", sum);
        Ok(sum)
    }
}

/// Element at `len / 2`.
pub fn middle_page(update: &[u32]) -> Option<u32> {
    update.get(update.len() / 2).copied()
}

fn parse_page(token: &str, line: usize) -> Result<u32> {
    token
        .trim()
        .parse()
        .map_err(|_| Error::format(line, format!("invalid page number {:?}", token)))
}

/// Parse `X|Y`.
pub fn parse_rule(text: &str, line: usize) -> Result<(u32, u32)> {
    let (before, after) = text
        .split_once('|')
        .ok_or_else(|| Error::format(line, "rule is missing '|'"))?;
    Ok((parse_page(before, line)?, parse_page(after, line)?))
}

/// Parse `a,b,c`. Repeated pages are rejected.
pub fn parse_update(text: &str, line: usize) -> Result<Vec<u32>> {
    let pages = text
        .split(',')
        .map(|token| parse_page(token, line))
        .collect::<Result<Vec<u32>>>()?;
    if let Some(page) = pages.iter().duplicates().next() {
        return Err(Error::format(line, format!("page {} listed twice", page)));
    }
    Ok(pages)
}

/// Rules, a blank line, then updates.
pub fn parse_manual<I, S>(lines: I) -> Result<Manual>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rules = RuleSet::new();
    let mut updates = Vec::new();
    let mut in_rules = true;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            in_rules = false;
            continue;
        }
        if in_rules {
            let (before, after) = parse_rule(line, index + 1)?;
            rules.add(before, after);
        } else {
            updates.push(parse_update(line, index + 1)?);
        }
    }

    if rules.is_empty() && updates.is_empty() {
        return Err(Error::format(1, "no rules or updates"));
    }
    debug!("{} rules, {} updates", rules.len(), updates.len());
    Ok(Manual { rules, updates })
}
