//! Radix router: a segment-level compressed prefix tree.
//!
//! Static edges carry runs of literal segments and split when a later route
//! diverges inside a run. Dynamic edges (`:param`, `:rest+`, `:rest*`/`*`)
//! are unnamed; each terminal slot remembers the names its own pattern binds,
//! so `/users/:id` and `/users/:uid/posts` share one parameter edge.
//!
//! Lookup order at every node: static, parameter, one-or-more catch-all,
//! zero-or-more catch-all. A node is only accepted if it has a payload for the
//! request method (or `*`); otherwise the descent backtracks.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RouterError;
use crate::log::SharedLogger;
use crate::method::{Method, MethodTable};
use crate::pattern::{path_segments, Params, Segment};
use crate::request::request_path;
use crate::route::{Match, RouteEntry};
use crate::Router;

/// The compiled tree plus the payload store.
#[derive(Debug)]
pub struct RadixRouter<T> {
    root: Node,
    payloads: Vec<T>,
    logger: SharedLogger,
}

/// A single node in the prefix tree.
#[derive(Debug, Default)]
struct Node {
    /// Static edges keyed by the first segment of their label.
    static_children: HashMap<String, Edge>,
    /// Single-segment parameter child.
    param_child: Option<Box<Node>>,
    /// `:name+` child. Terminal.
    one_or_more_child: Option<Box<Node>>,
    /// `:name*` / `*` child. Terminal.
    zero_or_more_child: Option<Box<Node>>,
    /// Payload slots for routes ending here.
    methods: MethodTable<Slot>,
}

/// A compressed run of literal segments.
#[derive(Debug)]
struct Edge {
    label: Vec<String>,
    node: Node,
}

/// A payload registered at a terminal node.
#[derive(Debug, Clone)]
struct Slot {
    /// Index into `RadixRouter::payloads`.
    payload: usize,
    /// One entry per dynamic segment on the way here; `None` for `*`.
    names: Arc<[Option<String>]>,
}

impl Edge {
    /// Split the label at `at`, pushing the tail and the current subtree down
    /// into a fresh child.
    fn split(&mut self, at: usize) {
        let tail = self.label.split_off(at);
        let child = std::mem::take(&mut self.node);
        if let Some(key) = tail.first().cloned() {
            self.node
                .static_children
                .insert(key, Edge { label: tail, node: child });
        }
    }

    /// Remaining path after consuming this edge's label, if it matches.
    fn strip<'p, 's>(&self, path: &'p [&'s str]) -> Option<&'p [&'s str]> {
        if path.len() < self.label.len() {
            return None;
        }
        let matched = self
            .label
            .iter()
            .zip(path)
            .all(|(label, segment)| label == segment);
        matched.then(|| &path[self.label.len()..])
    }
}

impl Node {
    /// Traverse or create nodes for a parsed pattern.
    fn traverse_or_create(&mut self, segments: &[Segment]) -> &mut Node {
        let Some((first, rest)) = segments.split_first() else {
            return self;
        };

        match first {
            Segment::Static(head) => {
                let run: Vec<&str> = segments
                    .iter()
                    .map_while(|s| match s {
                        Segment::Static(literal) => Some(literal.as_str()),
                        _ => None,
                    })
                    .collect();

                let edge = self
                    .static_children
                    .entry(head.clone())
                    .or_insert_with(|| Edge {
                        label: run.iter().map(|s| s.to_string()).collect(),
                        node: Node::default(),
                    });

                let common = edge
                    .label
                    .iter()
                    .zip(&run)
                    .take_while(|(label, segment)| label.as_str() == **segment)
                    .count();
                if common < edge.label.len() {
                    edge.split(common);
                }

                edge.node.traverse_or_create(&segments[common..])
            }
            Segment::Param(_) => self
                .param_child
                .get_or_insert_with(Box::default)
                .traverse_or_create(rest),
            Segment::OneOrMore(_) => self
                .one_or_more_child
                .get_or_insert_with(Box::default)
                .traverse_or_create(rest),
            Segment::ZeroOrMore(_) => self
                .zero_or_more_child
                .get_or_insert_with(Box::default)
                .traverse_or_create(rest),
        }
    }

    /// First slot for `method` here: exact method, else wildcard.
    fn first_slot(&self, method: &str) -> Option<&Slot> {
        self.methods.get(method).and_then(<[Slot]>::first)
    }

    /// Descend depth-first and return the first node able to serve `method`,
    /// pushing one captured value per dynamic edge taken.
    fn traverse_and_match<'a>(
        &'a self,
        segments: &[&str],
        method: &str,
        captured: &mut Vec<String>,
    ) -> Option<&'a Slot> {
        if let Some((&segment, remaining)) = segments.split_first() {
            // Static children take precedence (most specific match).
            if let Some(edge) = self.static_children.get(segment) {
                if let Some(rest) = edge.strip(segments) {
                    if let Some(slot) = edge.node.traverse_and_match(rest, method, captured) {
                        return Some(slot);
                    }
                }
            }

            if let Some(param_child) = &self.param_child {
                captured.push(segment.to_string());
                if let Some(slot) = param_child.traverse_and_match(remaining, method, captured) {
                    return Some(slot);
                }
                // Backtrack if this path didn't work.
                captured.pop();
            }

            if let Some(child) = &self.one_or_more_child {
                if let Some(slot) = child.first_slot(method) {
                    captured.push(segments.join("/"));
                    return Some(slot);
                }
            }
        } else if let Some(slot) = self.first_slot(method) {
            return Some(slot);
        }

        if let Some(child) = &self.zero_or_more_child {
            if let Some(slot) = child.first_slot(method) {
                captured.push(segments.join("/"));
                return Some(slot);
            }
        }

        None
    }

    /// Collect every terminal node matching `segments`, in the same order
    /// `traverse_and_match` would try them.
    fn collect_matches<'a>(
        &'a self,
        segments: &[&str],
        captured: &mut Vec<String>,
        out: &mut Vec<(&'a MethodTable<Slot>, Vec<String>)>,
    ) {
        if let Some((&segment, remaining)) = segments.split_first() {
            if let Some(edge) = self.static_children.get(segment) {
                if let Some(rest) = edge.strip(segments) {
                    edge.node.collect_matches(rest, captured, out);
                }
            }

            if let Some(param_child) = &self.param_child {
                captured.push(segment.to_string());
                param_child.collect_matches(remaining, captured, out);
                captured.pop();
            }

            if let Some(child) = &self.one_or_more_child {
                push_terminal(&child.methods, captured, segments, out);
            }
        } else if !self.methods.is_empty() {
            out.push((&self.methods, captured.clone()));
        }

        if let Some(child) = &self.zero_or_more_child {
            push_terminal(&child.methods, captured, segments, out);
        }
    }
}

fn push_terminal<'a>(
    methods: &'a MethodTable<Slot>,
    captured: &[String],
    tail: &[&str],
    out: &mut Vec<(&'a MethodTable<Slot>, Vec<String>)>,
) {
    if methods.is_empty() {
        return;
    }
    let mut values = captured.to_vec();
    values.push(tail.join("/"));
    out.push((methods, values));
}

impl<T> RadixRouter<T> {
    /// Build a router from normalized entries.
    pub fn new(entries: impl IntoIterator<Item = RouteEntry<T>>) -> Result<Self, RouterError> {
        Self::with_logger(entries, SharedLogger::default())
    }

    /// Build a router that reports to `logger`.
    pub fn with_logger(
        entries: impl IntoIterator<Item = RouteEntry<T>>,
        logger: SharedLogger,
    ) -> Result<Self, RouterError> {
        let mut root = Node::default();
        let mut payloads = Vec::new();

        for entry in entries {
            let compiled = entry.compile()?;
            logger.route_registered(compiled.pattern.as_str(), &compiled.methods);

            let names: Arc<[Option<String>]> = compiled
                .pattern
                .segments()
                .iter()
                .filter(|s| !matches!(s, Segment::Static(_)))
                .map(|s| s.name().map(str::to_string))
                .collect();
            let slot = Slot {
                payload: payloads.len(),
                names,
            };

            let node = root.traverse_or_create(compiled.pattern.segments());
            for method in compiled.methods {
                node.methods.insert(method, slot.clone());
            }
            payloads.push(compiled.payload);
        }

        Ok(Self {
            root,
            payloads,
            logger,
        })
    }

    fn resolve(&self, slot: &Slot, values: &[String]) -> Option<Match<'_, T>> {
        let payload = self.payloads.get(slot.payload)?;
        let pairs = slot
            .names
            .iter()
            .zip(values)
            .filter_map(|(name, value)| name.as_ref().map(|n| (n.clone(), value.clone())))
            .collect();
        Some(Match {
            payload,
            params: Params::from_pairs(pairs),
        })
    }
}

impl<T: Send + Sync> Router<T> for RadixRouter<T> {
    fn lookup(&self, method: &str, url: &str) -> Option<Match<'_, T>> {
        let path = request_path(url);
        let segments = path_segments(path);

        let mut captured = Vec::new();
        let found = self
            .root
            .traverse_and_match(&segments, method, &mut captured)
            .and_then(|slot| self.resolve(slot, &captured));

        self.logger
            .route_resolved(method, path, usize::from(found.is_some()));
        found
    }

    fn lookup_all(&self, method: &str, url: &str) -> Vec<Match<'_, T>> {
        let path = request_path(url);
        let segments = path_segments(path);

        let mut nodes = Vec::new();
        self.root
            .collect_matches(&segments, &mut Vec::new(), &mut nodes);

        let found: Vec<_> = nodes
            .iter()
            .flat_map(|(methods, values)| {
                methods
                    .matching(method)
                    .filter_map(move |slot| self.resolve(slot, values))
            })
            .collect();

        self.logger.route_resolved(method, path, found.len());
        found
    }

    fn allowed_methods(&self, url: &str) -> Vec<Method> {
        let segments = path_segments(request_path(url));

        let mut nodes = Vec::new();
        self.root
            .collect_matches(&segments, &mut Vec::new(), &mut nodes);

        let mut allowed: Vec<Method> = Vec::new();
        for method in nodes.iter().flat_map(|(methods, _)| methods.methods()) {
            if !method.is_any() && !allowed.contains(method) {
                allowed.push(method.clone());
            }
        }
        allowed
    }

    fn len(&self) -> usize {
        self.payloads.len()
    }
}
