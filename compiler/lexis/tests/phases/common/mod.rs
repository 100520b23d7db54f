//! Shared test utilities for phase tests.
//!
//! A program is a list of [`Stmt`]s. Nested scopes carry their own bodies;
//! the body of each scope is the payload of its `Scope`, so the runtime
//! walker finds its statements again from the scope tree alone.

use lexis::{
    BindingResult, Builtins, NamespaceBuilder, NamespaceRef, NamespaceTree, NestedScopes,
    NullBuilder, RuntimeError, RuntimeResult, ScopeBuilder, ScopeId, ScopeKind, ScopeTree,
    SharedInterner,
};

pub type Body = Vec<Stmt>;

/// Value the runtime walker binds to function and class names.
pub const DEFINED: i64 = -1;

#[derive(Clone, Debug)]
pub enum Stmt {
    /// `name = value`
    Assign(&'static str, i64),
    /// `dst = src`
    Copy(&'static str, &'static str),
    /// Read `name` and record the outcome.
    Read(&'static str),
    /// `del name`
    Del(&'static str),
    /// `(name := value)`
    Walrus(&'static str, i64),
    Nonlocal(&'static str),
    Global(&'static str),
    Def(&'static str, Body),
    Class(&'static str, Body),
    Lambda(Body),
    /// Comprehension over the given iteration variables. The walker stores
    /// the targets before the element, as the iteration does.
    Comp(Vec<&'static str>, Body),
}

/// Populates scopes from their bodies.
pub struct ScopeWalker<'a> {
    pub interner: &'a SharedInterner,
}

impl ScopeBuilder<Body> for ScopeWalker<'_> {
    fn build_scope(&mut self, tree: &mut ScopeTree<Body>, scope: ScopeId) -> BindingResult<()> {
        let body = tree.payload(scope).clone();
        let name = |s: &str| self.interner.intern(s);
        for stmt in body {
            match stmt {
                Stmt::Assign(n, _) | Stmt::Del(n) => tree.store(scope, name(n)),
                Stmt::Copy(dst, src) => {
                    tree.load(scope, name(src));
                    tree.store(scope, name(dst));
                }
                Stmt::Read(n) => tree.load(scope, name(n)),
                Stmt::Walrus(n, _) => tree.store_walrus(scope, name(n))?,
                Stmt::Nonlocal(n) => tree.add_nonlocal(scope, name(n))?,
                Stmt::Global(n) => tree.add_global(scope, name(n))?,
                Stmt::Def(n, body) => {
                    tree.nest(scope, ScopeKind::Function, Some(name(n)), body)?;
                }
                Stmt::Class(n, body) => {
                    tree.nest(scope, ScopeKind::Class, Some(name(n)), body)?;
                }
                Stmt::Lambda(body) => {
                    tree.nest(scope, ScopeKind::Lambda, None, body)?;
                }
                Stmt::Comp(targets, body) => {
                    tree.nest(scope, ScopeKind::Comprehension, None, comp_body(&targets, body))?;
                }
            }
        }
        Ok(())
    }
}

fn comp_body(targets: &[&'static str], body: Body) -> Body {
    targets
        .iter()
        .map(|t| Stmt::Assign(*t, 0))
        .chain(body)
        .collect()
}

/// Runs scope bodies, creating nested namespaces as it meets them.
pub struct Executor<'a> {
    pub interner: &'a SharedInterner,
    /// Outcome of every `Read` and of every failed `Del`, in execution order.
    pub log: Vec<(&'static str, RuntimeResult<i64>)>,
}

impl NamespaceBuilder<i64, Body> for Executor<'_> {
    fn build_namespace(
        &mut self,
        namespace: &NamespaceRef<i64, Body>,
        payload: &Body,
        nested: &mut NestedScopes,
    ) -> RuntimeResult<()> {
        for stmt in payload {
            let name = |s: &str| self.interner.intern(s);
            match *stmt {
                Stmt::Assign(n, value) => namespace.set(name(n), value),
                Stmt::Walrus(n, value) => namespace.store_walrus(name(n), value),
                Stmt::Copy(dst, src) => {
                    let value = namespace.get(name(src))?;
                    namespace.set(name(dst), value);
                }
                Stmt::Read(n) => {
                    let result = namespace.get(name(n));
                    self.log.push((n, result));
                }
                Stmt::Del(n) => {
                    if let Err(err) = namespace.delete(name(n)) {
                        self.log.push((n, Err(err)));
                    }
                }
                Stmt::Nonlocal(_) | Stmt::Global(_) => {}
                Stmt::Def(n, _) | Stmt::Class(n, _) => {
                    let n = name(n);
                    namespace.nest_next(nested, self)?;
                    namespace.set(n, DEFINED);
                }
                Stmt::Lambda(_) | Stmt::Comp(..) => {
                    namespace.nest_next(nested, self)?;
                }
            }
        }
        Ok(())
    }
}

/// Build the scope tree of `program`.
pub fn analyze(interner: &SharedInterner, program: Body) -> BindingResult<ScopeTree<Body>> {
    let mut tree = ScopeTree::new(program);
    tree.build(&mut ScopeWalker { interner })?;
    tree.check_invariants().unwrap();
    Ok(tree)
}

/// A program after analysis and execution.
pub struct Run {
    pub interner: SharedInterner,
    pub namespaces: NamespaceTree<i64, Body>,
    pub log: Vec<(&'static str, RuntimeResult<i64>)>,
}

impl Run {
    /// Outcomes of the reads of `name`, in execution order.
    pub fn reads(&self, name: &str) -> Vec<RuntimeResult<i64>> {
        self.log
            .iter()
            .filter(|(n, _)| *n == name)
            .map(|(_, result)| result.clone())
            .collect()
    }

    pub fn global(&self, name: &str) -> RuntimeResult<i64> {
        self.namespaces.root().get(self.interner.intern(name))
    }

    pub fn unbound_local(&self, name: &str) -> RuntimeResult<i64> {
        Err(RuntimeError::UnboundLocal {
            name: self.interner.intern(name),
        })
    }

    pub fn not_found(&self, name: &str) -> RuntimeResult<i64> {
        Err(RuntimeError::NameNotFound {
            name: self.interner.intern(name),
        })
    }
}

/// Analyze and execute `program` with the given builtins.
pub fn run_with(program: Body, builtins: &[(&str, i64)]) -> Run {
    lexis::init_tracing();
    let interner = SharedInterner::default();
    let tree = analyze(&interner, program).unwrap();
    let builtins: Builtins<i64> = builtins
        .iter()
        .map(|(n, v)| (interner.intern(n), *v))
        .collect();

    let namespaces: NamespaceTree<i64, Body> = NamespaceTree::global(tree, builtins).unwrap();
    let mut executor = Executor {
        interner: &interner,
        log: Vec::new(),
    };
    namespaces.root().build(&mut executor).unwrap();
    let log = executor.log;
    Run {
        interner,
        namespaces,
        log,
    }
}

pub fn run(program: Body) -> Run {
    run_with(program, &[])
}

/// Build a tree the test populated eagerly through the mutation methods.
pub fn build_eager(tree: &mut ScopeTree) {
    tree.build(&mut NullBuilder).unwrap();
    tree.check_invariants().unwrap();
}
