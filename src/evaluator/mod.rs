// ABOUTME: Phase-driven, dependency-ordered evaluator that walks the document tree

mod apply;
mod collect;
mod deps;
mod schedule;

use crate::backend::BackendRegistry;
use crate::cursor::Cursor;
use crate::error::{EvalError, PhaseErrors};
use crate::expr::Expression;
use crate::operators::{resolve_arg, Operator, OperatorRegistry, Phase, Response};
use crate::types::TypeRegistry;
use crate::value::Value;
use std::sync::Arc;

/// One leaf discovered during the tree scan whose string content matched the
/// `(( ... ))` delimiter and was successfully parsed.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub path: Cursor,
    pub expr: Expression,
    pub phase: Phase,
    pub status: CallSiteStatus,
}

/// Where a call site sits in the state machine of spec.md §4.6.6, collapsed
/// to the states that matter operationally — parsing happens eagerly during
/// collection, so there is no separate `Unparsed`/`Parsed` distinction here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSiteStatus {
    Ready,
    Running,
    Replaced,
    Injected,
    Errored,
}

/// Walks a document tree, resolving every `(( ... ))` call site against
/// itself and against whatever external sources its operators consult.
///
/// Two read-only global registries (`operators`, `types`) are constructed
/// once per process and shared `Arc`-wise across however many documents a
/// caller evaluates; per-document state (the tree itself, call sites,
/// prune/sort lists, the target stack) lives on the `Evaluator` instance.
pub struct Evaluator {
    root: Value,
    operators: Arc<OperatorRegistry>,
    types: Arc<TypeRegistry>,
    backends: Arc<BackendRegistry>,
    sites: Vec<CallSite>,
    current_site: usize,
    target_stack: Vec<Option<String>>,
    prune_list: Vec<Cursor>,
    sort_list: Vec<(Cursor, Option<String>)>,
}

impl Evaluator {
    pub fn new(
        root: Value,
        operators: Arc<OperatorRegistry>,
        types: Arc<TypeRegistry>,
        backends: Arc<BackendRegistry>,
    ) -> Self {
        Evaluator {
            root,
            operators,
            types,
            backends,
            sites: Vec::new(),
            current_site: 0,
            target_stack: Vec::new(),
            prune_list: Vec::new(),
            sort_list: Vec::new(),
        }
    }

    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    /// A cheap `Arc` clone of the operator registry, used to look up an
    /// operator without holding a borrow of `self` across the `&mut self`
    /// reborrow its `invoke` needs.
    pub fn operators_arc(&self) -> Arc<OperatorRegistry> {
        Arc::clone(&self.operators)
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    pub fn document(&self) -> &Value {
        &self.root
    }

    pub fn push_target(&mut self, target: Option<String>) {
        self.target_stack.push(target);
    }

    pub fn pop_target(&mut self) {
        self.target_stack.pop();
    }

    /// The innermost `@target` in scope, if any operator call on the stack
    /// set one. Consulted by the secret/object operators to pick a backend
    /// configuration.
    pub fn current_target(&self) -> Option<&str> {
        self.target_stack.iter().rev().find_map(|t| t.as_deref())
    }

    /// The path of the call site currently executing — what `prune`, `sort`,
    /// and `inject` all anchor their post-evaluation actions to.
    pub fn current_site_path(&self) -> Cursor {
        self.sites[self.current_site].path.clone()
    }

    pub fn add_prune(&mut self, path: Cursor) {
        self.prune_list.push(path);
    }

    pub fn add_sort(&mut self, path: Cursor, key: Option<String>) {
        self.sort_list.push((path, key));
    }

    pub fn resolve_cursor(&self, cursor: &Cursor) -> Result<Value, EvalError> {
        cursor.resolve(&self.root).cloned()
    }

    /// Test-only seam: installs a single call site at `path` and makes it the
    /// current one, so an individual operator's unit tests can exercise
    /// `current_site_path`/`add_prune`/`add_sort` without running a full phase.
    #[cfg(test)]
    pub fn set_current_site_path_for_test(&mut self, path: Cursor) {
        self.sites = vec![CallSite {
            path,
            expr: Expression::Literal(Value::Null),
            phase: Phase::Eval,
            status: CallSiteStatus::Running,
        }];
        self.current_site = 0;
    }

    /// Run every phase in order (Merge, Param, Eval) to completion, applying
    /// prune then sort post-actions, and return the materialized tree.
    /// Collects every failing call site into a `PhaseErrors` rather than
    /// stopping at the first one, per spec.md §7's "phase errors: aggregated".
    pub fn run(&mut self) -> Result<Value, PhaseErrors> {
        self.sites = collect::collect_call_sites(&self.root);

        for phase in Phase::all() {
            self.run_phase(phase)?;
        }

        apply::apply_prunes(&mut self.root, &mut self.prune_list);
        apply::apply_sorts(&mut self.root, &self.sort_list, &self.types);

        Ok(self.root.clone())
    }

    fn run_phase(&mut self, phase: Phase) -> Result<(), PhaseErrors> {
        let indices: Vec<usize> = self
            .sites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.phase == phase)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            return Ok(());
        }

        let graph = deps::build_graph(&self.sites, &indices);
        let order = schedule::topological_order(&indices, &graph).map_err(|cycle| {
            let mut errs = PhaseErrors::new();
            let sites_in_cycle: Vec<String> =
                cycle.iter().map(|&i| self.sites[i].path.to_string()).collect();
            errs.push(
                self.sites[cycle[0]].path.to_string(),
                EvalError::Cycle(sites_in_cycle),
            );
            errs
        })?;

        let mut errors = PhaseErrors::new();
        for idx in order {
            self.current_site = idx;
            self.sites[idx].status = CallSiteStatus::Running;
            let expr = self.sites[idx].expr.clone();
            match self.execute_site(&expr) {
                Ok(response) => {
                    let path = self.sites[idx].path.clone();
                    let action_status = apply::apply_response(&mut self.root, &path, response);
                    self.sites[idx].status = action_status;
                }
                Err(e) => {
                    self.sites[idx].status = CallSiteStatus::Errored;
                    errors.push(self.sites[idx].path.to_string(), e);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Execute a call site's root expression. An `OperatorCall` at the root
    /// dispatches through its operator's `invoke` directly so `Inject`
    /// responses survive; every other root shape (`Literal`, `Reference`,
    /// `EnvVar`, `LogicalOr`) is just a value to replace the leaf with,
    /// computed by the same argument-resolution protocol nested sub-
    /// expressions use.
    fn execute_site(&mut self, expr: &Expression) -> Result<Response, EvalError> {
        match expr {
            Expression::OperatorCall { name, target, args } => {
                // Clone the `Arc` so `op` borrows from this owned handle rather
                // than from `self` — the registry is read-only after construction,
                // so this is just sidestepping the borrow checker, not a real copy
                // of any operator state.
                let registry = self.operators_arc();
                let op = registry.get(name);
                self.push_target(target.clone());
                let result = match op {
                    Some(op) => op.invoke(self, args),
                    None => Err(EvalError::UnknownOperator(name.clone())),
                };
                self.pop_target();
                result
            }
            other => resolve_arg(self, other).map(Response::replace),
        }
    }
}
