//! Static classification tests.
//!
//! Each test analyzes a toy program with the scope walker from `common` and
//! compares the tree's dump, or the static binding error it raised.

use lexis::{BindingErrorKind, ErrorCode, ScopeEvent, ScopeKind, ScopeTree, SharedInterner};
use pretty_assertions::assert_eq;

use crate::common::{analyze, build_eager, Stmt::*};

#[test]
fn class_body_is_invisible_to_methods() {
    let interner = SharedInterner::default();
    let tree = analyze(
        &interner,
        vec![
            Assign("x", 1),
            Class("C", vec![Assign("x", 2), Def("m", vec![Read("x")])]),
        ],
    )
    .unwrap();

    let expected = "\
global(<globals>): L=[C, x]; U={}
  class(C): L=[m, x]; U={}
    function(m): L=[]; G=[x]; U={x: <globals>}
";
    assert_eq!(tree.dump(&interner), expected);
}

#[test]
fn nonlocal_passes_through_class_body() {
    let interner = SharedInterner::default();
    let tree = analyze(
        &interner,
        vec![Def(
            "f",
            vec![
                Assign("v", 1),
                Class("C", vec![Def("g", vec![Nonlocal("v"), Assign("v", 2)])]),
                Lambda(vec![Read("v")]),
            ],
        )],
    )
    .unwrap();

    let expected = "\
global(<globals>): L=[f]; U={}
  function(f): L=[C, v]; U={}
    class(C): L=[g]; U={}
      function(g): L=[]; NL=[v]; U={v: f}
    lambda(<lambda>): L=[]; NL=[v]; U={v: f}
";
    assert_eq!(tree.dump(&interner), expected);
}

#[test]
fn walrus_in_later_sibling_binds_for_earlier_closure() {
    let interner = SharedInterner::default();
    let tree = analyze(
        &interner,
        vec![Def(
            "f",
            vec![
                Lambda(vec![Read("t")]),
                Comp(vec!["i"], vec![Walrus("t", 1)]),
            ],
        )],
    )
    .unwrap();

    let expected = "\
global(<globals>): L=[f]; U={}
  function(f): L=[t]; U={}
    lambda(<lambda>): L=[]; NL=[t]; U={t: f}
    comprehension(<comprehension>): L=[i]; NL=[t]; U={t: f}
";
    assert_eq!(tree.dump(&interner), expected);
}

#[test]
fn nonlocal_without_binding_aborts_analysis() {
    let interner = SharedInterner::default();
    let err = analyze(
        &interner,
        vec![Assign("z", 0), Def("f", vec![Nonlocal("z")])],
    )
    .unwrap_err();

    assert_eq!(err.kind, BindingErrorKind::NonlocalNotFound);
    assert_eq!(err.code(), ErrorCode::E2002);
    assert_eq!(err.render(&interner), "error[E2002]: no binding for nonlocal 'z' found");
}

#[test]
fn declaration_order_matters() {
    let interner = SharedInterner::default();

    let err = analyze(&interner, vec![Def("f", vec![Read("y"), Global("y")])]).unwrap_err();
    assert_eq!(err.kind, BindingErrorKind::UsedBeforeGlobal);
    assert_eq!(
        err.render(&interner),
        "error[E2004]: name 'y' is used prior to global declaration"
    );

    let tree = analyze(&interner, vec![Def("f", vec![Global("y"), Read("y")])]).unwrap();
    assert!(tree.dump(&interner).contains("function(f): L=[]; G=[y]; U={y: <globals>}"));
}

#[test]
fn walrus_in_class_comprehension_aborts_analysis() {
    let interner = SharedInterner::default();
    let err = analyze(
        &interner,
        vec![Class("C", vec![Comp(vec!["i"], vec![Walrus("n", 1)])])],
    )
    .unwrap_err();
    assert_eq!(err.kind, BindingErrorKind::WalrusInClassBody);
}

#[test]
fn walrus_rebinding_iteration_variable_aborts_analysis() {
    let interner = SharedInterner::default();
    let err = analyze(
        &interner,
        vec![Def("f", vec![Comp(vec!["i"], vec![Walrus("i", 1)])])],
    )
    .unwrap_err();
    assert_eq!(err.kind, BindingErrorKind::WalrusRebindsIterationVar);
}

#[test]
fn event_script_matches_walker() {
    let interner = SharedInterner::default();
    let n = |s: &str| interner.intern(s);

    let walked = analyze(
        &interner,
        vec![
            Assign("x", 1),
            Def(
                "f",
                vec![Copy("y", "x"), Lambda(vec![Read("y"), Read("len")])],
            ),
        ],
    )
    .unwrap();

    let replayed = ScopeTree::<()>::from_events([
        ScopeEvent::Store(n("x")),
        ScopeEvent::Nest {
            kind: ScopeKind::Function,
            name: Some(n("f")),
        },
        ScopeEvent::Load(n("x")),
        ScopeEvent::Store(n("y")),
        ScopeEvent::Nest {
            kind: ScopeKind::Lambda,
            name: None,
        },
        ScopeEvent::Load(n("y")),
        ScopeEvent::Load(n("len")),
        ScopeEvent::End,
        ScopeEvent::End,
    ])
    .unwrap();

    assert_eq!(replayed.dump(&interner), walked.dump(&interner));
}

#[test]
fn eagerly_populated_tree_matches_walker() {
    let interner = SharedInterner::default();
    let n = |s: &str| interner.intern(s);

    let walked = analyze(
        &interner,
        vec![Def("f", vec![Assign("a", 1), Comp(vec!["i"], vec![Read("a")])])],
    )
    .unwrap();

    let mut eager = ScopeTree::new(());
    let f = eager
        .nest(eager.root(), ScopeKind::Function, Some(n("f")), ())
        .unwrap();
    eager.store(f, n("a"));
    let comp = eager.nest(f, ScopeKind::Comprehension, None, ()).unwrap();
    eager.store(comp, n("i"));
    eager.load(comp, n("a"));
    build_eager(&mut eager);

    assert_eq!(eager.dump(&interner), walked.dump(&interner));
}
