//! Runtime namespace tests.
//!
//! Programs run eagerly: the body of a function, lambda or comprehension
//! executes where it is defined, once, in a fresh namespace. Every `Read`
//! and every failed `Del` is logged under its name.

use lexis::{ErrorCode, RuntimeError, StringLookup};
use pretty_assertions::assert_eq;

use crate::common::{run, run_with, Stmt::*, DEFINED};

#[test]
fn method_reads_global_not_class_attribute() {
    let r = run(vec![
        Assign("x", 1),
        Class("C", vec![Assign("x", 2), Read("x"), Def("m", vec![Read("x")])]),
    ]);
    assert_eq!(r.reads("x"), vec![Ok(2), Ok(1)]);
    assert_eq!(r.global("C"), Ok(DEFINED));
    assert_eq!(r.global("x"), Ok(1));
}

#[test]
fn nonlocal_assignment_updates_enclosing_function() {
    let r = run(vec![Def(
        "f",
        vec![
            Assign("n", 0),
            Def("inc", vec![Nonlocal("n"), Assign("n", 5)]),
            Read("n"),
        ],
    )]);
    assert_eq!(r.reads("n"), vec![Ok(5)]);
    assert_eq!(r.global("n"), r.not_found("n"));
}

#[test]
fn read_before_assignment_is_unbound_local() {
    let r = run(vec![
        Assign("x", 1),
        Def("f", vec![Read("x"), Assign("x", 2), Read("x")]),
    ]);
    assert_eq!(r.reads("x"), vec![r.unbound_local("x"), Ok(2)]);
    assert_eq!(r.global("x"), Ok(1));
}

#[test]
fn free_name_read_before_assignment_is_not_found() {
    let r = run(vec![Def(
        "f",
        vec![Lambda(vec![Read("v")]), Assign("v", 1), Lambda(vec![Read("v")])],
    )]);
    assert_eq!(r.reads("v"), vec![r.not_found("v"), Ok(1)]);
}

#[test]
fn builtins_are_the_last_resort() {
    let r = run_with(
        vec![
            Def("f", vec![Read("len")]),
            Read("len"),
            Assign("len", 3),
            Read("len"),
            Def("g", vec![Read("len")]),
        ],
        &[("len", 10)],
    );
    assert_eq!(r.reads("len"), vec![Ok(10), Ok(10), Ok(3), Ok(3)]);
}

#[test]
fn undefined_name_is_not_found() {
    let r = run(vec![Read("nope"), Def("f", vec![Read("nope")])]);
    assert_eq!(r.reads("nope"), vec![r.not_found("nope"), r.not_found("nope")]);
}

#[test]
fn class_body_falls_back_to_globals_and_builtins() {
    let r = run_with(
        vec![
            Assign("x", 1),
            Class(
                "C",
                vec![Read("x"), Read("len"), Assign("x", 2), Read("x")],
            ),
            Read("x"),
        ],
        &[("len", 7)],
    );
    assert_eq!(r.reads("x"), vec![Ok(1), Ok(2), Ok(1)]);
    assert_eq!(r.reads("len"), vec![Ok(7)]);
}

#[test]
fn comprehension_in_class_skips_class_names() {
    let r = run(vec![Class(
        "C",
        vec![Assign("y", 1), Comp(vec!["i"], vec![Read("y"), Read("i")])],
    )]);
    assert_eq!(r.reads("y"), vec![r.not_found("y")]);
    assert_eq!(r.reads("i"), vec![Ok(0)]);

    let r = run(vec![
        Assign("y", 5),
        Class(
            "C",
            vec![Assign("y", 1), Comp(vec!["i"], vec![Read("y")])],
        ),
    ]);
    assert_eq!(r.reads("y"), vec![Ok(5)]);
}

#[test]
fn walrus_binds_outside_the_comprehension() {
    let r = run(vec![
        Def(
            "f",
            vec![Comp(vec!["i"], vec![Walrus("t", 4)]), Read("t")],
        ),
        Comp(vec!["i"], vec![Walrus("u", 9)]),
    ]);
    assert_eq!(r.reads("t"), vec![Ok(4)]);
    assert_eq!(r.global("u"), Ok(9));
    assert_eq!(r.global("t"), r.not_found("t"));
    assert_eq!(r.global("i"), r.not_found("i"));
}

#[test]
fn global_declaration_writes_module_namespace() {
    let r = run(vec![Def("f", vec![Global("g"), Assign("g", 3), Read("g")])]);
    assert_eq!(r.reads("g"), vec![Ok(3)]);
    assert_eq!(r.global("g"), Ok(3));
}

#[test]
fn delete_unbinds_without_falling_back() {
    let r = run(vec![
        Assign("a", 1),
        Del("a"),
        Read("a"),
        Del("a"),
        Assign("a", 2),
    ]);
    // Read, then the failed second delete.
    assert_eq!(r.reads("a"), vec![r.unbound_local("a"), r.unbound_local("a")]);
    assert_eq!(r.global("a"), Ok(2));
}

#[test]
fn builtins_are_never_deleted() {
    let r = run_with(
        vec![Def("f", vec![Global("len"), Del("len")]), Read("len")],
        &[("len", 10)],
    );
    assert_eq!(r.reads("len"), vec![r.not_found("len"), Ok(10)]);
    assert_eq!(r.namespaces.root().builtins().len(), 1);
}

#[test]
fn runtime_errors_render_with_names() {
    let r = run(vec![Def("f", vec![Read("x"), Assign("x", 1)]), Read("y")]);
    let errors: Vec<RuntimeError> = r
        .log
        .iter()
        .filter_map(|(_, result)| result.clone().err())
        .collect();

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].code(), ErrorCode::E6001);
    assert_eq!(
        errors[0].render(&r.interner),
        "error[E6001]: local variable 'x' referenced before assignment"
    );
    assert_eq!(errors[1].code(), ErrorCode::E6002);
    assert_eq!(errors[1].render(&r.interner), "error[E6002]: name 'y' is not defined");
    assert_eq!(errors[1].name(), Some(r.interner.intern("y")));
}

#[test]
fn module_namespace_lists_its_bindings() {
    let r = run(vec![
        Assign("b", 1),
        Def("f", vec![Global("a"), Assign("a", 2)]),
        Del("b"),
    ]);
    let mut names: Vec<&str> = r
        .namespaces
        .root()
        .local_names()
        .into_iter()
        .map(|n| r.interner.lookup(n))
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "b", "f"]);
    assert_eq!(r.global("a"), Ok(2));
    assert!(!r.namespaces.root().has(r.interner.intern("b")));
}
